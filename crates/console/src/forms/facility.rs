//! Hospital and clinic forms and the payloads built from them.

use careadmin_client::dto::{FACILITY_ADMIN_ROLE, FacilityUpdate, NewFacility};
use careadmin_core::{
    Address, Contact, DayHours, DomainError, DomainResult, Facility, FacilityAdmin, FacilityKind,
    OperatingHours, Weekday,
};

pub const DEFAULT_COUNTRY: &str = "India";
pub const MIN_PASSWORD_LEN: usize = 6;

pub const DEPARTMENT_OPTIONS: &[&str] = &[
    "Cardiology",
    "Neurology",
    "Orthopedics",
    "Pediatrics",
    "Gynecology",
    "Oncology",
    "Emergency",
    "ICU",
    "Surgery",
    "Radiology",
    "Laboratory",
    "Pharmacy",
    "Dermatology",
    "ENT",
    "Ophthalmology",
    "Psychiatry",
    "General Medicine",
    "Other",
];

pub const HOSPITAL_FACILITY_OPTIONS: &[&str] = &[
    "24/7 Emergency",
    "ICU",
    "NICU",
    "Blood Bank",
    "Pharmacy",
    "Laboratory",
    "X-Ray",
    "CT Scan",
    "MRI",
    "Ambulance Service",
    "Operation Theater",
    "Dialysis",
    "Cafeteria",
    "Parking",
];

pub const CLINIC_FACILITY_OPTIONS: &[&str] = &[
    "Consultation",
    "Pharmacy",
    "Laboratory",
    "X-Ray",
    "ECG",
    "Minor Surgery",
    "Vaccination",
    "Health Checkup",
    "Home Visit",
    "Telemedicine",
];

pub const CLINIC_SPECIALIZATION_OPTIONS: &[&str] = &[
    "General Practice",
    "Dental",
    "Dermatology",
    "Pediatrics",
    "Gynecology",
    "Ophthalmology",
    "ENT",
    "Orthopedics",
    "Physiotherapy",
    "Diagnostics",
    "Ayurvedic",
    "Homeopathy",
    "Multi-Specialty",
    "Other",
];

/// Comma-separated input to a list: entries trimmed, empties dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add `item` if absent, remove it if present.
pub fn toggle<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if let Some(pos) = list.iter().position(|x| *x == item) {
        list.remove(pos);
    } else {
        list.push(item);
    }
}

/// Toggle a tag that must come from `options` when added. Tags already on the
/// record can always be removed.
pub fn toggle_option(list: &mut Vec<String>, options: &[&str], item: &str) -> DomainResult<()> {
    let present = list.iter().any(|x| x == item);
    if !present && !options.contains(&item) {
        return Err(DomainError::validation(format!(
            "'{item}' is not one of: {}",
            options.join(", ")
        )));
    }
    toggle(list, item.to_string());
    Ok(())
}

/// Parse `Monday=09:00-17:00`, `Sunday=Closed` or `Friday=24x7`.
pub fn parse_day_hours(raw: &str) -> DomainResult<(Weekday, DayHours)> {
    let (day, hours) = raw
        .split_once('=')
        .ok_or_else(|| DomainError::validation(format!("expected DAY=OPEN-CLOSE, got '{raw}'")))?;
    let day: Weekday = day.parse()?;
    let hours = hours.trim();
    if hours.eq_ignore_ascii_case("closed") {
        return Ok((day, DayHours::closed()));
    }
    if hours.eq_ignore_ascii_case("24x7") {
        let mut h = DayHours::new("00:00", "23:59");
        h.is_24x7 = Some(true);
        return Ok((day, h));
    }
    let (open, close) = hours
        .split_once('-')
        .ok_or_else(|| DomainError::validation(format!("expected OPEN-CLOSE, got '{hours}'")))?;
    Ok((day, DayHours::new(open.trim(), close.trim())))
}

/// Parse `name,mobile,email[,password]` into an additional admin.
pub fn parse_admin(raw: &str) -> DomainResult<FacilityAdmin> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [name, mobile, email] | [name, mobile, email, _] if !name.is_empty() && !email.is_empty() => {
            Ok(FacilityAdmin {
                name: name.to_string(),
                mobile: mobile.to_string(),
                email: email.to_string(),
                password: parts.get(3).map(|p| p.to_string()).unwrap_or_default(),
            })
        }
        _ => Err(DomainError::validation(format!(
            "expected NAME,MOBILE,EMAIL[,PASSWORD], got '{raw}'"
        ))),
    }
}

fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_password(value: &str) -> DomainResult<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a new super-admin password.
pub fn validate_password(value: &str) -> DomainResult<()> {
    check_password(value)
}

fn parse_opt<T: core::str::FromStr>(field: &str, raw: &str) -> DomainResult<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| DomainError::validation(format!("{field} must be a whole number, got '{raw}'")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Create
// ─────────────────────────────────────────────────────────────────────────────

/// The create dialog: flat fields, nested on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFacilityForm {
    pub kind: FacilityKind,
    pub name: String,
    pub registration_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub email: String,
    pub super_admin_email: String,
    pub super_admin_password: String,
    pub emergency_contact: String,
    /// Comma-separated, as typed.
    pub specializations: String,
    /// Hospitals only.
    pub operating_hours: OperatingHours,
    /// Clinics only.
    pub days_of_operation: Vec<Weekday>,
}

impl NewFacilityForm {
    pub fn new(kind: FacilityKind) -> Self {
        Self {
            kind,
            name: String::new(),
            registration_number: String::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            phone: String::new(),
            email: String::new(),
            super_admin_email: String::new(),
            super_admin_password: String::new(),
            emergency_contact: String::new(),
            specializations: String::new(),
            operating_hours: OperatingHours::standard(),
            days_of_operation: Vec::new(),
        }
    }

    pub fn toggle_day(&mut self, day: Weekday) {
        toggle(&mut self.days_of_operation, day);
    }

    pub fn validate(&self) -> DomainResult<()> {
        require("name", &self.name)?;
        require("registration number", &self.registration_number)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("super admin email", &self.super_admin_email)?;
        require("super admin password", &self.super_admin_password)?;
        if self.kind == FacilityKind::Clinic && self.days_of_operation.is_empty() {
            return Err(DomainError::validation("select at least one day of operation"));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> DomainResult<NewFacility> {
        self.validate()?;
        let (operating_hours, days_of_operation) = match self.kind {
            FacilityKind::Hospital => (Some(self.operating_hours.clone()), None),
            FacilityKind::Clinic => (None, Some(self.days_of_operation.clone())),
        };
        Ok(NewFacility {
            name: self.name.clone(),
            registration_number: self.registration_number.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            super_admin_email: self.super_admin_email.clone(),
            super_admin_password: self.super_admin_password.clone(),
            facility_admin_role: FACILITY_ADMIN_ROLE,
            address: Address {
                street: self.street.clone(),
                landmark: None,
                city: self.city.clone(),
                state: self.state.clone(),
                pincode: self.pincode.clone(),
                country: Some(DEFAULT_COUNTRY.to_string()),
            },
            contact: Contact {
                emergency_contact: Some(self.emergency_contact.clone()),
                ..Contact::default()
            },
            operating_hours,
            days_of_operation,
            specializations: split_list(&self.specializations),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit
// ─────────────────────────────────────────────────────────────────────────────

/// The edit page: a flat mirror of the fetched record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityEditForm {
    pub kind: FacilityKind,
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub established_year: String,
    pub number_of_beds: String,
    pub website: String,
    pub description: String,
    pub emergency_contact: String,
    pub super_admin_email: String,
    /// Left empty unless the password should change.
    pub super_admin_password: String,
    pub admins: Vec<FacilityAdmin>,
    pub specializations: Vec<String>,
    pub departments: Vec<String>,
    pub facilities: Vec<String>,
    pub operating_hours: OperatingHours,
    pub specialization: String,
    pub days_of_operation: Vec<Weekday>,
    stored_registration_number: String,
}

impl FacilityEditForm {
    /// Populate from a fetched record, filling gaps with form defaults.
    pub fn from_facility(kind: FacilityKind, f: &Facility) -> Self {
        let operating_hours = match &f.operating_hours {
            Some(h) if h.iter().next().is_some() => h.clone(),
            _ => OperatingHours::standard(),
        };
        Self {
            kind,
            name: f.name.clone(),
            registration_number: f.registration_number.clone(),
            email: f.email.clone(),
            phone: f.phone.clone(),
            street: f.address.street.clone(),
            city: f.address.city.clone(),
            state: f.address.state.clone(),
            pincode: f.address.pincode.clone(),
            country: f
                .address
                .country
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            established_year: f.established_year.map(|y| y.to_string()).unwrap_or_default(),
            number_of_beds: f.number_of_beds.map(|n| n.to_string()).unwrap_or_default(),
            website: f.website.clone().unwrap_or_default(),
            description: f.description.clone().unwrap_or_default(),
            emergency_contact: f.contact.emergency_contact.clone().unwrap_or_default(),
            super_admin_email: f.super_admin_email.clone().unwrap_or_default(),
            super_admin_password: String::new(),
            admins: f.admins.clone(),
            specializations: f.specializations.clone(),
            departments: f.departments.clone(),
            facilities: f.facilities.clone(),
            operating_hours,
            specialization: f.specialization.clone().unwrap_or_default(),
            days_of_operation: f.days_of_operation.clone(),
            stored_registration_number: f.registration_number.clone(),
        }
    }

    pub fn facility_options(&self) -> &'static [&'static str] {
        match self.kind {
            FacilityKind::Hospital => HOSPITAL_FACILITY_OPTIONS,
            FacilityKind::Clinic => CLINIC_FACILITY_OPTIONS,
        }
    }

    pub fn toggle_department(&mut self, dept: &str) -> DomainResult<()> {
        if self.kind != FacilityKind::Hospital {
            return Err(DomainError::validation("departments apply to hospitals only"));
        }
        toggle_option(&mut self.departments, DEPARTMENT_OPTIONS, dept)
    }

    pub fn toggle_facility(&mut self, tag: &str) -> DomainResult<()> {
        let options = self.facility_options();
        toggle_option(&mut self.facilities, options, tag)
    }

    pub fn toggle_day(&mut self, day: Weekday) -> DomainResult<()> {
        if self.kind != FacilityKind::Clinic {
            return Err(DomainError::validation("days of operation apply to clinics only"));
        }
        toggle(&mut self.days_of_operation, day);
        Ok(())
    }

    pub fn set_hours(&mut self, day: Weekday, hours: DayHours) -> DomainResult<()> {
        if self.kind != FacilityKind::Hospital {
            return Err(DomainError::validation("operating hours apply to hospitals only"));
        }
        self.operating_hours.set(day, hours);
        Ok(())
    }

    pub fn set_specialization(&mut self, value: &str) -> DomainResult<()> {
        if self.kind != FacilityKind::Clinic {
            return Err(DomainError::validation("primary specialization applies to clinics only"));
        }
        if !value.is_empty() && !CLINIC_SPECIALIZATION_OPTIONS.contains(&value) {
            return Err(DomainError::validation(format!(
                "'{value}' is not one of: {}",
                CLINIC_SPECIALIZATION_OPTIONS.join(", ")
            )));
        }
        self.specialization = value.to_string();
        Ok(())
    }

    pub fn add_admin(&mut self, admin: FacilityAdmin) {
        self.admins.push(admin);
    }

    pub fn remove_admin(&mut self, index: usize) -> DomainResult<FacilityAdmin> {
        if index >= self.admins.len() {
            return Err(DomainError::validation(format!(
                "no admin at position {index} (have {})",
                self.admins.len()
            )));
        }
        Ok(self.admins.remove(index))
    }

    pub fn validate(&self) -> DomainResult<()> {
        require("name", &self.name)?;
        if !self.super_admin_password.is_empty() {
            check_password(&self.super_admin_password)?;
        }
        Ok(())
    }

    pub fn to_payload(&self) -> DomainResult<FacilityUpdate> {
        self.validate()?;
        let hospital = self.kind == FacilityKind::Hospital;
        Ok(FacilityUpdate {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: Address {
                street: self.street.clone(),
                landmark: None,
                city: self.city.clone(),
                state: self.state.clone(),
                pincode: self.pincode.clone(),
                country: Some(self.country.clone()),
            },
            established_year: parse_opt("established year", &self.established_year)?,
            number_of_beds: if hospital {
                parse_opt("number of beds", &self.number_of_beds)?
            } else {
                None
            },
            website: self.website.clone(),
            description: self.description.clone(),
            contact: Contact {
                emergency_contact: Some(self.emergency_contact.clone()),
                ..Contact::default()
            },
            super_admin_email: self.super_admin_email.clone(),
            admins: self.admins.clone(),
            specializations: self.specializations.clone(),
            departments: hospital.then(|| self.departments.clone()),
            facilities: self.facilities.clone(),
            operating_hours: hospital.then(|| self.operating_hours.clone()),
            specialization: (!hospital).then(|| self.specialization.clone()),
            days_of_operation: (!hospital).then(|| self.days_of_operation.clone()),
            super_admin_password: Some(self.super_admin_password.clone()).filter(|p| !p.is_empty()),
            registration_number: Some(self.registration_number.clone())
                .filter(|r| *r != self.stored_registration_number),
        })
    }
}
