//! Request and response bodies of the platform API.

use careadmin_auth::{AdminIdentity, PermissionSet};
use careadmin_core::{
    Address, Contact, Facility, FacilityAdmin, FacilityCredentials, OperatingHours, Staff, Weekday,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ErrorBody};

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// `{ success, error?, message?, data? }`, the shape most mutations answer with.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Treat anything but `success: true` as a rejection.
    pub fn require_success(self) -> Result<Option<T>, ClientError> {
        if self.success == Some(true) {
            Ok(self.data)
        } else {
            Err(ClientError::Rejected(ErrorBody {
                error: self.error.filter(|s| !s.is_empty()),
                message: self.message.filter(|s| !s.is_empty()),
            }))
        }
    }
}

/// `{ data: [...] }`; a missing or null `data` reads as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct DataList<T> {
    #[serde(default = "Option::default")]
    data: Option<Vec<T>>,
}

impl<T> DataList<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// Either `{ data: ... }` or the bare document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Wrapped<T> {
    Data { data: T },
    Bare(T),
}

impl<T> Wrapped<T> {
    pub fn into_inner(self) -> T {
        match self {
            Wrapped::Data { data } | Wrapped::Bare(data) => data,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub admin: Option<AdminIdentity>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Facilities
// ─────────────────────────────────────────────────────────────────────────────

/// Role assigned to the admin account created with a facility.
pub const FACILITY_ADMIN_ROLE: &str = "SuperAdmin";

/// Body of `POST /api/facilities/{hospitals,clinics}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFacility {
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub phone: String,
    pub super_admin_email: String,
    pub super_admin_password: String,
    pub facility_admin_role: &'static str,
    pub address: Address,
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_operation: Option<Vec<Weekday>>,
    pub specializations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FacilityCreated {
    #[serde(default)]
    pub credentials: Option<FacilityCredentials>,
    #[serde(default)]
    pub data: Option<Facility>,
}

/// Body of `PUT /api/facilities/{kind}/:id` from the edit form.
///
/// Hospital-only and clinic-only fields are `None` for the other kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established_year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_beds: Option<u32>,
    pub website: String,
    pub description: String,
    pub contact: Contact,
    pub super_admin_email: String,
    pub admins: Vec<FacilityAdmin>,
    pub specializations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<String>>,
    pub facilities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_operation: Option<Vec<Weekday>>,
    /// Sent only when a new password was typed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_admin_password: Option<String>,
    /// Sent only when it differs from the stored value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset<'a> {
    pub super_admin_password: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Staff
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub permissions: PermissionSet,
}

/// Body of `PUT /api/admin/staffs/:id/permissions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub permissions: PermissionSet,
}

/// `GET /api/admin/staffs` answers with `users` as either the list itself or
/// an object holding `staffs`.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffListResponse {
    #[serde(default)]
    users: Value,
}

impl StaffListResponse {
    pub fn into_staff(self) -> Result<Vec<Staff>, ClientError> {
        let list = match self.users {
            Value::Array(_) => self.users,
            Value::Object(mut obj) => obj.remove("staffs").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        if list.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(list).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// `GET /api/admin/staffs/:id` answers with `user`, `staff`, or the record
/// itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StaffDetailResponse {
    User { user: StaffDetail },
    Staff { staff: StaffDetail },
    Bare(StaffDetail),
}

impl StaffDetailResponse {
    pub fn into_detail(self) -> StaffDetail {
        match self {
            StaffDetailResponse::User { user } => user,
            StaffDetailResponse::Staff { staff } => staff,
            StaffDetailResponse::Bare(detail) => detail,
        }
    }
}

/// The fields the staff edit form reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaffDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub permissions: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_requires_explicit_success() {
        let ok: Envelope<Value> = serde_json::from_value(json!({ "success": true, "data": 1 })).unwrap();
        assert_eq!(ok.require_success().unwrap(), Some(json!(1)));

        let missing: Envelope<Value> = serde_json::from_value(json!({ "data": 1 })).unwrap();
        assert!(matches!(missing.require_success(), Err(ClientError::Rejected(_))));

        let rejected: Envelope<Value> =
            serde_json::from_value(json!({ "success": false, "error": "Invalid credentials" })).unwrap();
        let err = rejected.require_success().unwrap_err();
        assert_eq!(err.error_field(), Some("Invalid credentials"));
    }

    #[test]
    fn staff_list_accepts_both_shapes() {
        let a: StaffListResponse =
            serde_json::from_value(json!({ "users": [{ "id": "s1", "name": "Asha" }] })).unwrap();
        assert_eq!(a.into_staff().unwrap().len(), 1);

        let b: StaffListResponse = serde_json::from_value(json!({
            "users": { "staffs": [{ "id": "s1", "name": "Asha" }, { "id": "s2", "name": "Ravi" }] }
        }))
        .unwrap();
        assert_eq!(b.into_staff().unwrap().len(), 2);

        let c: StaffListResponse = serde_json::from_value(json!({ "users": {} })).unwrap();
        assert!(c.into_staff().unwrap().is_empty());
    }

    #[test]
    fn staff_detail_unwraps_any_shape() {
        for body in [
            json!({ "user": { "name": "A" } }),
            json!({ "staff": { "name": "A" } }),
            json!({ "name": "A" }),
        ] {
            let r: StaffDetailResponse = serde_json::from_value(body).unwrap();
            assert_eq!(r.into_detail().name.as_deref(), Some("A"));
        }
    }

    #[test]
    fn update_omits_unset_optional_fields() {
        let u = FacilityUpdate {
            name: "N".into(),
            email: String::new(),
            phone: String::new(),
            address: Address::default(),
            established_year: None,
            number_of_beds: None,
            website: String::new(),
            description: String::new(),
            contact: Contact::default(),
            super_admin_email: String::new(),
            admins: vec![],
            specializations: vec![],
            departments: None,
            facilities: vec![],
            operating_hours: None,
            specialization: Some("Dental".into()),
            days_of_operation: Some(vec![Weekday::Monday]),
            super_admin_password: None,
            registration_number: None,
        };
        let v = serde_json::to_value(&u).unwrap();
        assert!(v.get("superAdminPassword").is_none());
        assert!(v.get("registrationNumber").is_none());
        assert!(v.get("numberOfBeds").is_none());
        assert_eq!(v["daysOfOperation"], json!(["Monday"]));
        assert_eq!(v["specialization"], json!("Dental"));
    }
}
