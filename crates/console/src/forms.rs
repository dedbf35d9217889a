//! Local form state mirroring the API payloads.
//!
//! Only form-level checks happen here (required fields, password length,
//! clinic days); the server stays authoritative.

pub mod facility;
pub mod staff;

pub use facility::{FacilityEditForm, NewFacilityForm};
pub use staff::StaffForm;
