//! Hospitals and clinics as returned by `/api/facilities/*`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DomainError, Entity, FacilityId};

// ─────────────────────────────────────────────────────────────────────────────
// Facility kind
// ─────────────────────────────────────────────────────────────────────────────

/// The two facility collections exposed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityKind {
    Hospital,
    Clinic,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 2] = [FacilityKind::Hospital, FacilityKind::Clinic];

    /// Route segment used by the console (`/facilities/edit/hospital/:id`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityKind::Hospital => "hospital",
            FacilityKind::Clinic => "clinic",
        }
    }

    /// Collection segment of the REST API (`/api/facilities/hospitals`).
    pub fn collection(&self) -> &'static str {
        match self {
            FacilityKind::Hospital => "hospitals",
            FacilityKind::Clinic => "clinics",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacilityKind::Hospital => "Hospital",
            FacilityKind::Clinic => "Clinic",
        }
    }
}

impl core::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for FacilityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hospital" | "hospitals" => Ok(FacilityKind::Hospital),
            "clinic" | "clinics" => Ok(FacilityKind::Clinic),
            other => Err(DomainError::validation(format!(
                "unknown facility type '{other}' (expected hospital or clinic)"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Week schedule
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter label shown on day toggles.
    pub fn short(&self) -> &'static str {
        &self.as_str()[..3]
    }
}

impl core::fmt::Display for Weekday {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Weekday {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| {
                let name = d.as_str().to_ascii_lowercase();
                name == needle || name[..3] == needle
            })
            .ok_or_else(|| DomainError::validation(format!("unknown day '{s}'")))
    }
}

/// Marker used by the platform for a day without opening hours.
pub const CLOSED: &str = "Closed";

/// Opening and closing time of a single day (`"09:00"`, or `"Closed"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub open: String,
    pub close: String,
    #[serde(default, rename = "is24x7", skip_serializing_if = "Option::is_none")]
    pub is_24x7: Option<bool>,
}

impl DayHours {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            is_24x7: None,
        }
    }

    pub fn closed() -> Self {
        Self::new(CLOSED, CLOSED)
    }

    pub fn is_closed(&self) -> bool {
        self.open == CLOSED || self.close == CLOSED
    }
}

impl core::fmt::Display for DayHours {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_24x7 == Some(true) {
            f.write_str("24x7")
        } else if self.is_closed() {
            f.write_str(CLOSED)
        } else {
            write!(f, "{}-{}", self.open, self.close)
        }
    }
}

/// Day → hours map (ordered Monday..Sunday).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(pub BTreeMap<Weekday, DayHours>);

impl OperatingHours {
    /// Schedule pre-filled on new hospital forms: weekdays 09:00–17:00,
    /// Saturday 09:00–14:00, Sunday closed.
    pub fn standard() -> Self {
        let mut hours = BTreeMap::new();
        for day in Weekday::ALL {
            let h = match day {
                Weekday::Saturday => DayHours::new("09:00", "14:00"),
                Weekday::Sunday => DayHours::closed(),
                _ => DayHours::new("09:00", "17:00"),
            };
            hours.insert(day, h);
        }
        Self(hours)
    }

    pub fn get(&self, day: Weekday) -> Option<&DayHours> {
        self.0.get(&day)
    }

    pub fn set(&mut self, day: Weekday, hours: DayHours) {
        self.0.insert(day, hours);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Weekday, &DayHours)> {
        self.0.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Facility record
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts: Vec<&str> = [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.pincode.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

/// Additional facility administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacilityAdmin {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Super-admin login returned once when a facility is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityCredentials {
    pub email: String,
    pub password: String,
}

/// A hospital or clinic.
///
/// Hospitals use `operating_hours`, `departments` and `number_of_beds`;
/// clinics use `days_of_operation` and `specialization`. The remaining fields
/// are shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    #[serde(rename = "_id")]
    pub id: FacilityId,
    pub name: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_operation: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specializations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_beds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_admin_email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<FacilityAdmin>,
}

impl Facility {
    /// Case-insensitive search over name and registration number.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q) || self.registration_number.to_lowercase().contains(&q)
    }
}

impl Entity for Facility {
    type Id = FacilityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
