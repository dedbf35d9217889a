//! Display name and role cached at login for the app bar.

use crate::{LocalStorage, StorageError};

pub const NAME_KEY: &str = "adminName";
pub const ROLE_KEY: &str = "adminRole";

const DEFAULT_NAME: &str = "Admin User";
const DEFAULT_ROLE: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub role: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl Profile {
    /// Read the cached entries; missing or empty ones fall back to defaults.
    pub fn load(storage: &(impl LocalStorage + ?Sized)) -> Self {
        let read = |key: &str, default: &str| match storage.get_item(key) {
            Ok(Some(v)) if !v.is_empty() => v,
            Ok(_) => default.to_string(),
            Err(err) => {
                tracing::warn!(key, error = %err, "could not read profile entry");
                default.to_string()
            }
        };
        Self {
            name: read(NAME_KEY, DEFAULT_NAME),
            role: read(ROLE_KEY, DEFAULT_ROLE),
        }
    }

    pub fn store(storage: &(impl LocalStorage + ?Sized), name: &str, role: Option<&str>) -> Result<(), StorageError> {
        storage.set_item(NAME_KEY, name)?;
        match role {
            Some(role) => storage.set_item(ROLE_KEY, role),
            None => storage.remove_item(ROLE_KEY),
        }
    }

    pub fn clear(storage: &(impl LocalStorage + ?Sized)) -> Result<(), StorageError> {
        storage.remove_item(NAME_KEY)?;
        storage.remove_item(ROLE_KEY)
    }

    /// First two characters of the name, uppercased.
    pub fn initials(&self) -> String {
        self.name.chars().take(2).flat_map(char::to_uppercase).collect()
    }
}
