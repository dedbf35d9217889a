//! Platform staff records as returned by `/api/admin/staffs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DomainError, Entity, StaffId, truthy};

/// Permissions as they appear on a staff listing.
///
/// Older accounts carry a flat list of permission labels; current ones carry
/// the nested flag object (`manageFacilities`, `facilitiesActions.create`, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaffPermissions {
    Labels(Vec<String>),
    Flags(Map<String, Value>),
}

impl StaffPermissions {
    /// Flatten into display lines: `key: Yes/No` for top-level flags and
    /// `group.key: Yes/No` for one level of nesting. Other values are skipped.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            StaffPermissions::Labels(labels) => labels.clone(),
            StaffPermissions::Flags(flags) => {
                let mut lines = Vec::new();
                for (key, value) in flags {
                    match value {
                        Value::Bool(b) => lines.push(format!("{key}: {}", yes_no(*b))),
                        Value::Object(group) => {
                            for (sub, v) in group {
                                lines.push(format!("{key}.{sub}: {}", yes_no(truthy(v))));
                            }
                        }
                        _ => {}
                    }
                }
                lines
            }
        }
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

/// A staff member. Listings may carry `id`, `_id` or both; `id` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StaffRecord")]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub systemrole: Option<String>,
    #[serde(default)]
    pub permissions: Option<StaffPermissions>,
}

/// Wire shape of [`Staff`] before the id keys are reconciled.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffRecord {
    #[serde(default)]
    id: Option<StaffId>,
    #[serde(default, rename = "_id")]
    document_id: Option<StaffId>,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    systemrole: Option<String>,
    #[serde(default)]
    permissions: Option<StaffPermissions>,
}

impl TryFrom<StaffRecord> for Staff {
    type Error = DomainError;

    fn try_from(r: StaffRecord) -> Result<Self, Self::Error> {
        let id = r
            .id
            .or(r.document_id)
            .ok_or_else(|| DomainError::invalid_id("staff record has neither `id` nor `_id`"))?;
        Ok(Self {
            id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            profile_image: r.profile_image,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
            last_login: r.last_login,
            systemrole: r.systemrole,
            permissions: r.permissions,
        })
    }
}

impl Staff {
    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }
}

impl Entity for Staff {
    type Id = StaffId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_flags() {
        let staff: Staff = serde_json::from_value(json!({
            "id": "s1",
            "name": "Asha",
            "email": "asha@example.com",
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "permissions": {
                "manageHome": true,
                "platformStaffActions": { "create": false, "read": true },
                "note": "ignored"
            }
        }))
        .unwrap();

        assert_eq!(staff.status_label(), "Active");
        assert!(staff.created_at.is_some());
        let lines = staff.permissions.unwrap().display_lines();
        assert_eq!(
            lines,
            vec![
                "manageHome: Yes".to_string(),
                "platformStaffActions.create: No".to_string(),
                "platformStaffActions.read: Yes".to_string(),
            ]
        );
    }

    #[test]
    fn accepts_label_lists_and_document_ids() {
        let staff: Staff = serde_json::from_value(json!({
            "_id": "s2",
            "name": "Ravi",
            "permissions": ["reports", "billing"]
        }))
        .unwrap();
        assert_eq!(staff.id.as_str(), "s2");
        assert_eq!(staff.status_label(), "Inactive");
        let perms = staff.permissions.unwrap();
        assert_eq!(perms.display_lines(), vec!["reports", "billing"]);
    }

    #[test]
    fn prefers_id_when_both_keys_are_present() {
        let staff: Staff = serde_json::from_value(json!({
            "_id": "mongo-1",
            "id": "s3",
            "name": "Meera"
        }))
        .unwrap();
        assert_eq!(staff.id.as_str(), "s3");

        let err = serde_json::from_value::<Staff>(json!({ "name": "Nobody" })).unwrap_err();
        assert!(err.to_string().contains("neither"));
    }
}
