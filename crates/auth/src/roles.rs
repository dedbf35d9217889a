use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role name as asserted by the platform (e.g. `"HealthcareAdmin"`).
///
/// Roles are opaque strings; the only one with meaning on this side is the
/// super role, which bypasses per-action permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Platform-wide administrator.
    pub const HEALTHCARE_ADMIN: Role = Role(Cow::Borrowed("HealthcareAdmin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_super_admin(&self) -> bool {
        self.as_str() == Self::HEALTHCARE_ADMIN.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
