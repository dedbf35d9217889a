//! `careadmin-core`: records exchanged with the facility platform API.
//!
//! This crate holds **plain data** only (no HTTP, no storage). The remote API
//! owns the lifecycle of every record defined here.

pub mod entity;
pub mod error;
pub mod facility;
pub mod id;
pub mod json;
pub mod location;
pub mod staff;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use facility::{
    Address, Contact, DayHours, Facility, FacilityAdmin, FacilityCredentials, FacilityKind,
    OperatingHours, Weekday,
};
pub use id::{FacilityId, LocationId, StaffId};
pub use json::truthy;
pub use location::{Location, LocationQuery, LocationStats};
pub use staff::{Staff, StaffPermissions};
