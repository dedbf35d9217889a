//! Strongly-typed identifiers for remote records.
//!
//! The platform API issues opaque string ids (document ids), so these wrap a
//! `String` rather than a UUID. Ids end up as URL path segments, so parsing
//! rejects anything that would change the path shape.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a hospital or clinic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(String);

/// Identifier of a platform staff member (admins included).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

/// Identifier of a facility branch/location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

fn check_segment(name: &str, raw: &str) -> Result<(), DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: empty")));
    }
    if raw.contains(['/', '?', '#']) || raw.chars().any(char::is_whitespace) {
        return Err(DomainError::invalid_id(format!(
            "{name}: '{raw}' is not a single path segment"
        )));
    }
    Ok(())
}

macro_rules! impl_string_id {
    ($t:ident, $name:literal) => {
        impl $t {
            /// Wrap an id received from the server without checking it.
            pub fn from_server(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                check_segment($name, s)?;
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_string_id!(FacilityId, "FacilityId");
impl_string_id!(StaffId, "StaffId");
impl_string_id!(LocationId, "LocationId");
