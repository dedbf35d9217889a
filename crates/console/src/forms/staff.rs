//! Platform staff create/edit forms.

use careadmin_auth::{PERMISSION_GROUPS, PermissionSet};
use careadmin_client::dto::{NewStaff, StaffDetail, StaffUpdate};
use careadmin_core::{DomainError, DomainResult};

use super::facility::MIN_PASSWORD_LEN;

#[derive(Debug, Clone, PartialEq)]
pub struct StaffForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Create only.
    pub password: String,
    pub permissions: PermissionSet,
}

impl StaffForm {
    /// Blank creation form: every module on, every action off.
    pub fn for_create() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            permissions: PermissionSet::create_template(),
        }
    }

    /// Edit form populated from a fetched record; its permissions are laid
    /// over the all-off template so every checkbox has a value.
    pub fn for_edit(detail: &StaffDetail) -> Self {
        let fetched = detail
            .permissions
            .as_ref()
            .map(PermissionSet::from_value)
            .unwrap_or_default();
        Self {
            name: detail.name.clone().unwrap_or_default(),
            email: detail.email.clone().unwrap_or_default(),
            phone: detail.phone.clone().unwrap_or_default(),
            password: String::new(),
            permissions: PermissionSet::edit_template().overlay(&fetched),
        }
    }

    /// Tick or untick one catalogue checkbox (`facilitiesActions.update`).
    pub fn set_permission(&mut self, key: &str, checked: bool) -> DomainResult<()> {
        self.permissions
            .set(key, checked)
            .map_err(|e| DomainError::validation(e.to_string()))
    }

    /// Checkbox rows: group name, label, key, checked.
    pub fn checkboxes(&self) -> Vec<(&'static str, &'static str, &'static str, bool)> {
        PERMISSION_GROUPS
            .iter()
            .flat_map(|g| g.entries.iter().map(move |e| (g.name, e.label, e.key)))
            .map(|(group, label, key)| {
                (group, label, key, self.permissions.get(key).unwrap_or(false))
            })
            .collect()
    }

    fn validate_identity(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        Ok(())
    }

    pub fn to_new_staff(&self) -> DomainResult<NewStaff> {
        self.validate_identity()?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(NewStaff {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password: self.password.clone(),
            permissions: self.permissions.clone(),
        })
    }

    pub fn to_update(&self) -> DomainResult<StaffUpdate> {
        self.validate_identity()?;
        Ok(StaffUpdate {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            permissions: self.permissions.clone(),
        })
    }
}
