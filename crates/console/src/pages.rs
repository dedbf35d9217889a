//! One module per screen. Each function is a full user interaction: it
//! mounts the page, talks to the API, toasts the outcome and navigates.

pub mod facilities;
pub mod facility_edit;
pub mod locations;
pub mod login;
pub mod staff;
