//! Process-wide holder of the signed-in administrator.
//!
//! The identity lives in memory behind a lock and is mirrored to durable
//! storage under [`IDENTITY_KEY`]. There is no expiry on this side; the
//! server decides when a token stops working.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use careadmin_core::StaffId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{LocalStorage, PermissionSet, Role, StorageError};

/// Storage key of the serialized identity.
pub const IDENTITY_KEY: &str = "HealthCareAdmin";

/// The `admin` object returned by a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StaffId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "systemrole", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
    /// Fields this client does not interpret, kept so the stored blob
    /// round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AdminIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            role: None,
            permissions: None,
            extra: Map::new(),
        }
    }
}

pub struct AuthContext<S> {
    storage: S,
    user: RwLock<Option<AdminIdentity>>,
}

impl<S: LocalStorage> AuthContext<S> {
    /// Load the stored identity, if any.
    ///
    /// Unreadable or unparseable data yields an anonymous context.
    pub fn init(storage: S) -> Self {
        let user = match storage.get_item(IDENTITY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<AdminIdentity>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, "stored identity is not valid; starting signed out");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored identity; starting signed out");
                None
            }
        };
        if let Some(u) = &user {
            tracing::debug!(name = %u.name, "restored identity");
        }
        Self {
            storage,
            user: RwLock::new(user),
        }
    }

    pub fn user(&self) -> Option<AdminIdentity> {
        self.read().clone()
    }

    pub fn permissions(&self) -> Option<PermissionSet> {
        self.read().as_ref().and_then(|u| u.permissions.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Replace the identity and persist it, overwriting any prior value.
    pub fn login(&self, user: AdminIdentity) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&user).map_err(|source| StorageError::Corrupt {
            path: IDENTITY_KEY.into(),
            source,
        })?;
        *self.write() = Some(user);
        self.storage.set_item(IDENTITY_KEY, &raw)?;
        tracing::info!("identity stored");
        Ok(())
    }

    /// Swap the in-memory identity without touching storage; the next
    /// start sees whatever `login` last wrote.
    pub fn replace(&self, user: Option<AdminIdentity>) {
        *self.write() = user;
    }

    /// Forget the identity in memory and in storage.
    pub fn logout(&self) -> Result<(), StorageError> {
        *self.write() = None;
        self.storage.remove_item(IDENTITY_KEY)?;
        tracing::info!("identity cleared");
        Ok(())
    }

    // A panicking writer cannot leave `Option<AdminIdentity>` half-updated,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Option<AdminIdentity>> {
        self.user.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AdminIdentity>> {
        self.user.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Action, MemoryStorage, Module, has_action};
    use serde_json::json;

    fn sample() -> AdminIdentity {
        serde_json::from_value(json!({
            "_id": "a1",
            "name": "Asha",
            "email": "asha@example.com",
            "systemrole": "PlatformStaff",
            "profileImage": "https://cdn.example.com/a1.png",
            "permissions": {
                "manageFacilities": true,
                "facilitiesActions": { "create": false, "read": true, "update": true, "delete": false }
            }
        }))
        .unwrap()
    }

    #[test]
    fn login_survives_a_fresh_context() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AuthContext::init(storage.clone());
        assert!(!ctx.is_authenticated());

        ctx.login(sample()).unwrap();

        let fresh = AuthContext::init(storage.clone());
        assert_eq!(fresh.user(), Some(sample()));
        assert_eq!(
            fresh.user().unwrap().extra.get("profileImage"),
            Some(&json!("https://cdn.example.com/a1.png"))
        );
        let perms = fresh.permissions();
        assert!(has_action(perms.as_ref(), Module::Facilities, Action::Update));
        assert!(!has_action(perms.as_ref(), Module::Facilities, Action::Delete));
    }

    #[test]
    fn logout_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AuthContext::init(storage.clone());
        ctx.login(sample()).unwrap();
        ctx.logout().unwrap();

        assert!(ctx.user().is_none());
        assert!(storage.get_item(IDENTITY_KEY).unwrap().is_none());
        assert!(!AuthContext::init(storage).is_authenticated());
    }

    #[test]
    fn second_login_overwrites_the_first() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AuthContext::init(storage.clone());
        ctx.login(sample()).unwrap();
        ctx.login(AdminIdentity::new("Ravi", "ravi@example.com")).unwrap();

        let fresh = AuthContext::init(storage);
        assert_eq!(fresh.user().unwrap().name, "Ravi");
    }

    #[test]
    fn replace_is_memory_only() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AuthContext::init(storage.clone());
        ctx.login(sample()).unwrap();

        ctx.replace(Some(AdminIdentity::new("Ravi", "ravi@example.com")));
        assert_eq!(ctx.user().unwrap().name, "Ravi");
        assert!(ctx.permissions().is_none());
        assert_eq!(AuthContext::init(storage.clone()).user(), Some(sample()));

        ctx.replace(None);
        assert!(!ctx.is_authenticated());
        assert!(AuthContext::init(storage).is_authenticated());
    }

    #[test]
    fn corrupt_identity_starts_anonymous() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(IDENTITY_KEY, "{not json").unwrap();
        let ctx = AuthContext::init(storage);
        assert!(ctx.user().is_none());
        assert!(ctx.permissions().is_none());
    }

    #[test]
    fn role_comes_from_systemrole_only() {
        let a: AdminIdentity = serde_json::from_value(json!({ "name": "x", "role": "HealthcareAdmin" })).unwrap();
        assert!(a.role.is_none());
        assert_eq!(a.extra.get("role"), Some(&json!("HealthcareAdmin")));
        let b = serde_json::to_value(sample()).unwrap();
        assert_eq!(b["systemrole"], json!("PlatformStaff"));
        assert_eq!(b["_id"], json!("a1"));
        assert!(b.get("id").is_none());
    }

    #[test]
    fn document_with_both_id_keys_and_both_role_keys_decodes() {
        let a: AdminIdentity = serde_json::from_value(json!({
            "_id": "a1",
            "id": "a1",
            "name": "Asha",
            "systemrole": "HealthcareAdmin",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(a.id.as_ref().map(|id| id.as_str()), Some("a1"));
        assert!(a.role.unwrap().is_super_admin());
        assert_eq!(a.extra.get("_id"), Some(&json!("a1")));
        assert_eq!(a.extra.get("role"), Some(&json!("admin")));
    }
}
