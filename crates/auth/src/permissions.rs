//! Permission evaluation over the snapshot issued at login.
//!
//! On the wire a permission object is a flat JSON object with one boolean flag
//! per module and an optional action group per module:
//!
//! ```json
//! {
//!   "role": "PlatformStaff",
//!   "manageFacilities": true,
//!   "facilitiesActions": { "create": false, "read": true, "update": true, "delete": false }
//! }
//! ```
//!
//! Internally every module maps to an explicit [`ModuleGrant`]; which group key
//! belongs to which module is enumerated on [`Module`], never derived from the
//! module name.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use careadmin_core::truthy;

use crate::{AuthzError, Role};

// ─────────────────────────────────────────────────────────────────────────────
// Actions and modules
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AuthzError::UnknownPermission(s.to_string()))
    }
}

/// Console areas gated by a module flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Module {
    Home,
    PlatformStaffs,
    Facilities,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Home, Module::PlatformStaffs, Module::Facilities];

    /// Key of the module flag (`manageFacilities`).
    pub fn key(&self) -> &'static str {
        match self {
            Module::Home => "manageHome",
            Module::PlatformStaffs => "managePlatformStaffs",
            Module::Facilities => "manageFacilities",
        }
    }

    /// Key of the module's action group (`facilitiesActions`).
    pub fn actions_key(&self) -> &'static str {
        match self {
            Module::Home => "homeActions",
            Module::PlatformStaffs => "platformStaffActions",
            Module::Facilities => "facilitiesActions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Module::Home => "Home",
            Module::PlatformStaffs => "Platform Staffs",
            Module::Facilities => "Facilities",
        }
    }

    /// A granted module whose action group was never recorded allows every
    /// action. Only the modules whose forms always write an action group
    /// behave this way; for the rest a missing group denies.
    pub fn unrestricted_without_actions(&self) -> bool {
        matches!(self, Module::PlatformStaffs | Module::Facilities)
    }

    /// Action flags of these modules grant only on a literal `true`; the home
    /// group accepts any truthy value.
    fn exact_action_flags(&self) -> bool {
        matches!(self, Module::PlatformStaffs | Module::Facilities)
    }

    pub fn from_key(key: &str) -> Option<Module> {
        Module::ALL.into_iter().find(|m| m.key() == key)
    }

    fn from_actions_key(key: &str) -> Option<Module> {
        Module::ALL.into_iter().find(|m| m.actions_key() == key)
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

impl core::str::FromStr for Module {
    type Err = AuthzError;

    /// Accepts the flag key (`manageFacilities`) or a short name
    /// (`facilities`, `platform-staffs`, `home`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(m) = Module::from_key(s) {
            return Ok(m);
        }
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "home" => Ok(Module::Home),
            "platformstaffs" | "platformstaff" | "staff" | "staffs" => Ok(Module::PlatformStaffs),
            "facilities" | "facility" => Ok(Module::Facilities),
            _ => Err(AuthzError::UnknownPermission(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Grants
// ─────────────────────────────────────────────────────────────────────────────

/// Per-action flags of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionGrants {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl ActionGrants {
    pub fn all() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    pub fn set(&mut self, action: Action, allowed: bool) {
        match action {
            Action::Create => self.create = allowed,
            Action::Read => self.read = allowed,
            Action::Update => self.update = allowed,
            Action::Delete => self.delete = allowed,
        }
    }

    fn from_value(value: &Value, exact: bool) -> Self {
        let mut grants = Self::default();
        for action in Action::ALL {
            let flag = value.get(action.as_str());
            let allowed = if exact {
                matches!(flag, Some(Value::Bool(true)))
            } else {
                flag.is_some_and(truthy)
            };
            grants.set(action, allowed);
        }
        grants
    }

    fn to_value(self) -> Value {
        let mut obj = Map::new();
        for action in Action::ALL {
            obj.insert(action.as_str().to_string(), Value::Bool(self.allows(action)));
        }
        Value::Object(obj)
    }
}

/// State of one module: its flag, and its action group if one was recorded.
///
/// `granted` holds only for a literal `true`; `enabled` holds for any truthy
/// flag and is what action checks look at. `actions: None` means "no
/// per-action restriction was recorded", which is different from a recorded
/// group with every action denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleGrant {
    pub granted: bool,
    pub enabled: bool,
    pub actions: Option<ActionGrants>,
}

impl ModuleGrant {
    fn flag(on: bool, actions: Option<ActionGrants>) -> Self {
        Self {
            granted: on,
            enabled: on,
            actions,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Permission set
// ─────────────────────────────────────────────────────────────────────────────

/// Typed view of a permission object.
///
/// Modules absent from the source object are absent here too, and keys this
/// client does not model are carried along untouched, so the JSON form
/// survives a decode/encode cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionSet {
    role: Option<Role>,
    modules: BTreeMap<Module, ModuleGrant>,
    extra: Map<String, Value>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: grant `module`, optionally recording its action group.
    pub fn with_module(mut self, module: Module, actions: Option<ActionGrants>) -> Self {
        self.modules.insert(module, ModuleGrant::flag(true, actions));
        self
    }

    pub fn set_role(&mut self, role: Option<Role>) {
        self.role = role;
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_super_admin)
    }

    pub fn module(&self, module: Module) -> Option<&ModuleGrant> {
        self.modules.get(&module)
    }

    pub fn set_module(&mut self, module: Module, granted: bool) {
        let grant = self.modules.entry(module).or_default();
        grant.granted = granted;
        grant.enabled = granted;
    }

    /// Keys outside the three modelled modules, as received.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Set one action flag, recording an all-denied group first if needed.
    pub fn set_action(&mut self, module: Module, action: Action, allowed: bool) {
        self.modules
            .entry(module)
            .or_default()
            .actions
            .get_or_insert_with(ActionGrants::default)
            .set(action, allowed);
    }

    /// Read a flag by form key: `manageHome` or `facilitiesActions.update`.
    pub fn get(&self, key: &str) -> Result<bool, AuthzError> {
        let (module, action) = parse_key(key)?;
        let grant = self.modules.get(&module);
        Ok(match action {
            None => grant.is_some_and(|g| g.granted),
            Some(action) => grant
                .and_then(|g| g.actions)
                .is_some_and(|a| a.allows(action)),
        })
    }

    /// Write a flag by form key.
    pub fn set(&mut self, key: &str, value: bool) -> Result<(), AuthzError> {
        match parse_key(key)? {
            (module, None) => self.set_module(module, value),
            (module, Some(action)) => self.set_action(module, action, value),
        }
        Ok(())
    }

    /// Starting point of the staff creation form: every module on, every
    /// recorded action off.
    pub fn create_template() -> Self {
        Self::new()
            .with_module(Module::Home, None)
            .with_module(Module::PlatformStaffs, Some(ActionGrants::default()))
            .with_module(Module::Facilities, Some(ActionGrants::default()))
    }

    /// Starting point of the staff edit form: everything off.
    pub fn edit_template() -> Self {
        let mut set = Self::new();
        set.set_module(Module::Home, false);
        for module in [Module::PlatformStaffs, Module::Facilities] {
            set.modules
                .insert(module, ModuleGrant::flag(false, Some(ActionGrants::default())));
        }
        set
    }

    /// Lay `other` over `self`: flags, action groups and unmodelled keys
    /// present in `other` replace the ones in `self`; everything else is kept.
    pub fn overlay(&self, other: &PermissionSet) -> PermissionSet {
        let mut merged = self.clone();
        if other.role.is_some() {
            merged.role = other.role.clone();
        }
        for (module, theirs) in &other.modules {
            let entry = merged.modules.entry(*module).or_default();
            entry.granted = theirs.granted;
            entry.enabled = theirs.enabled;
            if theirs.actions.is_some() {
                entry.actions = theirs.actions;
            }
        }
        for (key, value) in &other.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Lenient decode: anything that is not the expected shape reads as
    /// "not granted".
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let role = obj
            .get("role")
            .and_then(Value::as_str)
            .map(|r| Role::new(r.to_string()));

        let mut modules = BTreeMap::new();
        for module in Module::ALL {
            let flag = obj.get(module.key());
            let group = obj.get(module.actions_key());
            if flag.is_none() && group.is_none() {
                continue;
            }
            let granted = matches!(flag, Some(Value::Bool(true)));
            let enabled = flag.is_some_and(truthy);
            // A falsy group (null, false, 0, "") counts as "never recorded".
            let actions = group
                .filter(|g| truthy(g))
                .map(|g| ActionGrants::from_value(g, module.exact_action_flags()));
            modules.insert(
                module,
                ModuleGrant {
                    granted,
                    enabled,
                    actions,
                },
            );
        }

        let extra = obj
            .iter()
            .filter(|(key, _)| key.as_str() != "role" && !is_module_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            role,
            modules,
            extra,
        }
    }

    /// Module flags are written as booleans holding their strict reading.
    pub fn to_value(&self) -> Value {
        let mut obj = self.extra.clone();
        if let Some(role) = &self.role {
            obj.insert("role".to_string(), Value::String(role.as_str().to_string()));
        }
        for (module, grant) in &self.modules {
            obj.insert(module.key().to_string(), Value::Bool(grant.granted));
            if let Some(actions) = grant.actions {
                obj.insert(module.actions_key().to_string(), actions.to_value());
            }
        }
        Value::Object(obj)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn parse_key(key: &str) -> Result<(Module, Option<Action>), AuthzError> {
    let parsed = match key.split_once('.') {
        None => Module::from_key(key).map(|m| (m, None)),
        Some((group, action)) => Module::from_actions_key(group)
            .zip(action.parse::<Action>().ok())
            .map(|(m, a)| (m, Some(a))),
    };
    parsed.ok_or_else(|| AuthzError::UnknownPermission(key.to_string()))
}

fn is_module_key(key: &str) -> bool {
    Module::from_key(key).is_some() || Module::from_actions_key(key).is_some()
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// True iff the module flag is granted. No identity means no access.
pub fn has_module(permissions: Option<&PermissionSet>, module: Module) -> bool {
    permissions
        .and_then(|p| p.module(module))
        .is_some_and(|g| g.granted)
}

/// Whether `action` on `module` is allowed.
///
/// - no permission set: denied
/// - super role: allowed
/// - module flag truthy, no action group recorded: allowed for facilities and
///   platform staffs, denied otherwise
/// - otherwise: module flag truthy and action flag set (a literal `true` for
///   facilities and platform staffs, any truthy value for home)
pub fn has_action(permissions: Option<&PermissionSet>, module: Module, action: Action) -> bool {
    let Some(permissions) = permissions else {
        return false;
    };
    if permissions.is_super_admin() {
        return true;
    }
    let Some(grant) = permissions.module(module) else {
        return false;
    };
    match grant.actions {
        None => grant.enabled && module.unrestricted_without_actions(),
        Some(actions) => grant.enabled && actions.allows(action),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Form catalogue
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionEntry {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGroup {
    pub name: &'static str,
    pub entries: &'static [PermissionEntry],
}

const fn entry(key: &'static str, label: &'static str) -> PermissionEntry {
    PermissionEntry { key, label }
}

/// Checkboxes offered by the staff create/edit forms, in display order.
pub const PERMISSION_GROUPS: &[PermissionGroup] = &[
    PermissionGroup {
        name: "Home",
        entries: &[entry("manageHome", "Manage Home")],
    },
    PermissionGroup {
        name: "Platform Staffs",
        entries: &[
            entry("managePlatformStaffs", "Manage Platform Staffs"),
            entry("platformStaffActions.create", "Create Staff"),
            entry("platformStaffActions.read", "Read Staff"),
            entry("platformStaffActions.update", "Update Staff"),
            entry("platformStaffActions.delete", "Delete Staff"),
        ],
    },
    PermissionGroup {
        name: "Facilities",
        entries: &[
            entry("manageFacilities", "Manage Facilities"),
            entry("facilitiesActions.create", "Create Facility"),
            entry("facilitiesActions.read", "Read Facility"),
            entry("facilitiesActions.update", "Update Facility"),
            entry("facilitiesActions.delete", "Delete Facility"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn perms(v: Value) -> PermissionSet {
        PermissionSet::from_value(&v)
    }

    #[test]
    fn module_flag_must_be_boolean_true() {
        assert!(has_module(Some(&perms(json!({ "manageFacilities": true }))), Module::Facilities));
        for v in [json!("true"), json!(1), json!(null), json!(false), json!({})] {
            let p = perms(json!({ "manageFacilities": v }));
            assert!(!has_module(Some(&p), Module::Facilities), "value {v} must not grant");
        }
        assert!(!has_module(Some(&perms(json!({}))), Module::Facilities));
        assert!(!has_module(None, Module::Facilities));
    }

    #[test]
    fn action_checks_accept_truthy_flags() {
        let p = perms(json!({ "manageFacilities": 1 }));
        assert!(!has_module(Some(&p), Module::Facilities));
        assert!(has_action(Some(&p), Module::Facilities, Action::Create));

        let p = perms(json!({ "manageHome": true, "homeActions": { "read": 1, "update": 0 } }));
        assert!(has_action(Some(&p), Module::Home, Action::Read));
        assert!(!has_action(Some(&p), Module::Home, Action::Update));

        let p = perms(json!({ "manageFacilities": 1, "facilitiesActions": { "read": 1, "update": true } }));
        assert!(!has_action(Some(&p), Module::Facilities, Action::Read));
        assert!(has_action(Some(&p), Module::Facilities, Action::Update));

        let p = perms(json!({ "manageFacilities": "", "facilitiesActions": { "read": true } }));
        assert!(!has_action(Some(&p), Module::Facilities, Action::Read));
    }

    #[test]
    fn unmodelled_keys_survive_decode_overlay_and_encode() {
        let fetched = perms(json!({
            "manageFacilities": true,
            "manageReports": true,
            "reportsActions": { "read": true }
        }));
        assert_eq!(fetched.extra().get("manageReports"), Some(&json!(true)));

        let merged = PermissionSet::edit_template().overlay(&fetched);
        let v = merged.to_value();
        assert_eq!(v["manageReports"], json!(true));
        assert_eq!(v["reportsActions"], json!({ "read": true }));
        assert_eq!(v["manageFacilities"], json!(true));
        assert!(v.get("role").is_none());
    }

    #[test]
    fn super_role_bypasses_action_checks() {
        let p = perms(json!({ "role": "HealthcareAdmin" }));
        assert!(has_action(Some(&p), Module::Facilities, Action::Delete));

        let p = perms(json!({
            "role": "HealthcareAdmin",
            "manageFacilities": false,
            "facilitiesActions": { "delete": false }
        }));
        assert!(has_action(Some(&p), Module::Facilities, Action::Delete));
        assert!(has_action(Some(&p), Module::Home, Action::Read));
    }

    #[test]
    fn granted_module_without_action_group_is_unrestricted() {
        let p = perms(json!({ "manageFacilities": true }));
        for action in Action::ALL {
            assert!(has_action(Some(&p), Module::Facilities, action));
        }

        let p = perms(json!({ "managePlatformStaffs": true, "platformStaffActions": null }));
        assert!(has_action(Some(&p), Module::PlatformStaffs, Action::Update));
    }

    #[test]
    fn recorded_action_group_is_enforced() {
        let p = perms(json!({ "manageFacilities": true, "facilitiesActions": { "create": false } }));
        assert!(!has_action(Some(&p), Module::Facilities, Action::Create));
        assert!(!has_action(Some(&p), Module::Facilities, Action::Read));

        let p = perms(json!({ "manageFacilities": true, "facilitiesActions": { "read": true } }));
        assert!(has_action(Some(&p), Module::Facilities, Action::Read));
        assert!(!has_action(Some(&p), Module::Facilities, Action::Update));

        let p = perms(json!({ "manageFacilities": false, "facilitiesActions": { "read": true } }));
        assert!(!has_action(Some(&p), Module::Facilities, Action::Read));
    }

    #[test]
    fn missing_identity_fails_closed() {
        assert!(!has_action(None, Module::Home, Action::Read));
    }

    #[test]
    fn home_needs_its_action_group() {
        let p = perms(json!({ "manageHome": true }));
        assert!(!has_action(Some(&p), Module::Home, Action::Read));

        let p = perms(json!({ "manageHome": true, "homeActions": { "read": true } }));
        assert!(has_action(Some(&p), Module::Home, Action::Read));
        assert!(!has_action(Some(&p), Module::Home, Action::Delete));
    }

    #[test]
    fn dot_path_keys_read_and_write_flags() {
        let mut p = PermissionSet::create_template();
        assert!(p.get("manageHome").unwrap());
        assert!(!p.get("facilitiesActions.update").unwrap());

        p.set("facilitiesActions.update", true).unwrap();
        p.set("manageHome", false).unwrap();
        assert!(p.get("facilitiesActions.update").unwrap());
        assert!(!p.get("manageHome").unwrap());

        assert!(p.set("facilitiesActions.archive", true).is_err());
        assert!(p.get("manageReports").is_err());
    }

    #[test]
    fn every_catalogue_key_is_addressable() {
        let mut p = PermissionSet::new();
        for group in PERMISSION_GROUPS {
            for e in group.entries {
                p.set(e.key, true).unwrap();
                assert!(p.get(e.key).unwrap(), "{}", e.key);
            }
        }
    }

    #[test]
    fn templates_match_the_forms() {
        assert_eq!(
            PermissionSet::create_template().to_value(),
            json!({
                "manageHome": true,
                "managePlatformStaffs": true,
                "platformStaffActions": { "create": false, "read": false, "update": false, "delete": false },
                "manageFacilities": true,
                "facilitiesActions": { "create": false, "read": false, "update": false, "delete": false }
            })
        );

        let edit = PermissionSet::edit_template();
        assert!(Module::ALL.iter().all(|m| !has_module(Some(&edit), *m)));
    }

    #[test]
    fn overlay_keeps_template_groups_for_partial_records() {
        let fetched = perms(json!({
            "manageFacilities": true,
            "facilitiesActions": { "read": true }
        }));
        let merged = PermissionSet::edit_template().overlay(&fetched);

        assert!(merged.get("manageFacilities").unwrap());
        assert!(merged.get("facilitiesActions.read").unwrap());
        assert!(!merged.get("managePlatformStaffs").unwrap());
        assert_eq!(
            merged.module(Module::PlatformStaffs).unwrap().actions,
            Some(ActionGrants::default())
        );
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::String),
        ]
    }

    fn grant() -> impl Strategy<Value = Option<ModuleGrant>> {
        proptest::option::of(
            (any::<bool>(), proptest::option::of(any::<[bool; 4]>())).prop_map(|(granted, acts)| {
                ModuleGrant {
                    granted,
                    enabled: granted,
                    actions: acts.map(|[create, read, update, delete]| ActionGrants {
                        create,
                        read,
                        update,
                        delete,
                    }),
                }
            }),
        )
    }

    proptest! {
        #[test]
        fn has_module_is_exactly_boolean_true(v in leaf()) {
            let p = perms(json!({ "manageFacilities": v.clone() }));
            prop_assert_eq!(has_module(Some(&p), Module::Facilities), v == Value::Bool(true));
        }

        #[test]
        fn super_role_grants_regardless_of_groups(g in leaf(), a in 0usize..4) {
            let p = perms(json!({
                "role": "HealthcareAdmin",
                "facilitiesActions": { "create": g.clone(), "read": g.clone(), "update": g.clone(), "delete": g }
            }));
            prop_assert!(has_action(Some(&p), Module::Facilities, Action::ALL[a]));
        }

        #[test]
        fn encoding_is_stable(home in grant(), staff in grant(), fac in grant(), admin in any::<bool>()) {
            let mut p = PermissionSet::new();
            if admin {
                p.set_role(Some(Role::HEALTHCARE_ADMIN));
            }
            for (m, g) in [(Module::Home, home), (Module::PlatformStaffs, staff), (Module::Facilities, fac)] {
                if let Some(g) = g {
                    p.modules.insert(m, g);
                }
            }
            prop_assert_eq!(PermissionSet::from_value(&p.to_value()), p);
        }
    }
}
