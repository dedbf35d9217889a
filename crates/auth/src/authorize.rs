use serde::Serialize;
use thiserror::Error;

use crate::{Action, Module, PermissionSet, has_module};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    Anonymous,

    #[error("forbidden: module '{0}' is not granted")]
    ModuleDisabled(Module),

    #[error("unknown permission '{0}'")]
    UnknownPermission(String),
}

/// Gate a whole area (a page) on its module flag.
///
/// Pure policy check; no IO.
pub fn authorize_module(permissions: Option<&PermissionSet>, module: Module) -> Result<(), AuthzError> {
    match permissions {
        None => Err(AuthzError::Anonymous),
        Some(_) if has_module(permissions, module) => Ok(()),
        Some(_) => Err(AuthzError::ModuleDisabled(module)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Explanations
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    SuperRole,
    Unrestricted,
    ActionGranted,
    NoIdentity,
    ModuleNotGranted,
    ActionNotGranted,
    NoActionGroup,
}

impl Reason {
    pub fn message(&self) -> &'static str {
        match self {
            Reason::SuperRole => "super role bypasses action checks",
            Reason::Unrestricted => "module granted with no per-action restriction",
            Reason::ActionGranted => "module and action both granted",
            Reason::NoIdentity => "no signed-in identity",
            Reason::ModuleNotGranted => "module flag is not granted",
            Reason::ActionNotGranted => "action flag is not granted",
            Reason::NoActionGroup => "module has no action group recorded",
        }
    }
}

/// Why an action was (or would be) allowed or denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub module: Module,
    pub action: Action,
    pub granted: bool,
    pub reason: Reason,
}

impl Serialize for Module {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl Serialize for Action {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Explain the outcome of [`has_action`](crate::has_action). `granted` always equals what
/// `has_action` returns for the same inputs.
pub fn explain(permissions: Option<&PermissionSet>, module: Module, action: Action) -> Decision {
    let reason = match permissions {
        None => Reason::NoIdentity,
        Some(p) if p.is_super_admin() => Reason::SuperRole,
        Some(p) => match p.module(module) {
            None => Reason::ModuleNotGranted,
            Some(g) if !g.enabled => Reason::ModuleNotGranted,
            Some(g) => match g.actions {
                None if module.unrestricted_without_actions() => Reason::Unrestricted,
                None => Reason::NoActionGroup,
                Some(a) if a.allows(action) => Reason::ActionGranted,
                Some(_) => Reason::ActionNotGranted,
            },
        },
    };
    let granted = matches!(reason, Reason::SuperRole | Reason::Unrestricted | Reason::ActionGranted);
    Decision {
        module,
        action,
        granted,
        reason,
    }
}

/// Every module/action pair with its decision, in display order.
pub fn capability_matrix(permissions: Option<&PermissionSet>) -> Vec<Decision> {
    Module::ALL
        .into_iter()
        .flat_map(|m| Action::ALL.into_iter().map(move |a| explain(permissions, m, a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::has_action;
    use serde_json::json;

    fn perms(v: serde_json::Value) -> PermissionSet {
        PermissionSet::from_value(&v)
    }

    #[test]
    fn authorize_module_checks_the_flag_only() {
        let p = perms(json!({ "managePlatformStaffs": true, "platformStaffActions": {} }));
        assert_eq!(authorize_module(Some(&p), Module::PlatformStaffs), Ok(()));
        assert_eq!(
            authorize_module(Some(&p), Module::Facilities),
            Err(AuthzError::ModuleDisabled(Module::Facilities))
        );
        assert_eq!(authorize_module(None, Module::Home), Err(AuthzError::Anonymous));
    }

    #[test]
    fn explanations_agree_with_evaluation() {
        let samples = [
            None,
            Some(perms(json!({ "role": "HealthcareAdmin" }))),
            Some(perms(json!({ "manageFacilities": true }))),
            Some(perms(json!({ "manageFacilities": 1, "facilitiesActions": { "read": "yes" } }))),
            Some(perms(json!({ "manageHome": true }))),
            Some(perms(json!({ "manageFacilities": true, "facilitiesActions": { "update": true } }))),
            Some(perms(json!({ "manageFacilities": false, "facilitiesActions": { "update": true } }))),
        ];
        for p in &samples {
            for d in capability_matrix(p.as_ref()) {
                assert_eq!(d.granted, has_action(p.as_ref(), d.module, d.action), "{d:?}");
            }
        }
    }

    #[test]
    fn explain_names_the_reason() {
        let p = perms(json!({ "manageHome": true }));
        assert_eq!(explain(Some(&p), Module::Home, Action::Read).reason, Reason::NoActionGroup);
        assert_eq!(
            explain(Some(&p), Module::Facilities, Action::Read).reason,
            Reason::ModuleNotGranted
        );

        let d = explain(None, Module::Home, Action::Read);
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({ "module": "manageHome", "action": "read", "granted": false, "reason": "no_identity" })
        );
    }
}
