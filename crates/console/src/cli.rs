//! Command-line surface of `careadmin`.

use careadmin_core::{FacilityId, FacilityKind, LocationId, LocationQuery, StaffId, Weekday};
use clap::{Args, Parser, Subcommand};

use crate::render::OutputFormat;

/// Administration console for the healthcare facility platform.
#[derive(Parser, Debug)]
#[command(name = "careadmin", version, about)]
pub struct Cli {
    /// Output format.
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Answer yes to every confirmation.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long, env = "CAREADMIN_EMAIL")]
        email: Option<String>,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the cached profile.
    Logout,

    /// Show the signed-in profile and what it may do.
    Whoami,

    /// Hospitals and clinics.
    Facilities {
        #[command(subcommand)]
        action: FacilitiesAction,
    },

    /// Platform staff accounts.
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },

    /// Facility branches (read-only).
    Locations {
        #[command(subcommand)]
        action: LocationsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum FacilitiesAction {
    /// List hospitals and clinics.
    List {
        /// Only this kind.
        #[arg(long)]
        kind: Option<FacilityKind>,
        /// Filter by name or registration number.
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    Show { kind: FacilityKind, id: FacilityId },

    /// Register a hospital and its admin account.
    CreateHospital {
        #[command(flatten)]
        fields: NewFacilityArgs,
        /// Opening hours override, `Day=HH:MM-HH:MM`, `Day=Closed` or `Day=24x7`.
        #[arg(long = "hours")]
        hours: Vec<String>,
    },

    /// Register a clinic and its admin account.
    CreateClinic {
        #[command(flatten)]
        fields: NewFacilityArgs,
        /// Day of operation; repeat for each day.
        #[arg(long = "day", required = true)]
        days: Vec<Weekday>,
    },

    /// Change fields of an existing facility.
    Edit {
        kind: FacilityKind,
        id: FacilityId,
        #[command(flatten)]
        changes: EditFacilityArgs,
    },

    Delete { kind: FacilityKind, id: FacilityId },

    /// Set a new password for the facility admin.
    ResetPassword {
        kind: FacilityKind,
        id: FacilityId,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct NewFacilityArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub registration_number: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub street: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub pincode: String,
    #[arg(long, default_value = "")]
    pub emergency_contact: String,
    /// Comma-separated.
    #[arg(long, default_value = "")]
    pub specializations: String,
    /// Login of the facility admin account.
    #[arg(long)]
    pub admin_email: String,
    /// Prompted for when omitted.
    #[arg(long)]
    pub admin_password: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EditFacilityArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub registration_number: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub pincode: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub established_year: Option<String>,
    #[arg(long)]
    pub beds: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub emergency_contact: Option<String>,
    #[arg(long)]
    pub admin_email: Option<String>,
    /// New admin password; left unchanged when omitted.
    #[arg(long)]
    pub admin_password: Option<String>,
    /// Replace the specializations list (comma-separated).
    #[arg(long)]
    pub specializations: Option<String>,
    /// Clinic primary specialization.
    #[arg(long)]
    pub specialization: Option<String>,
    #[arg(long = "toggle-department")]
    pub toggle_departments: Vec<String>,
    #[arg(long = "toggle-facility")]
    pub toggle_facilities: Vec<String>,
    #[arg(long = "toggle-day")]
    pub toggle_days: Vec<Weekday>,
    /// `Day=HH:MM-HH:MM`, `Day=Closed` or `Day=24x7`.
    #[arg(long = "hours")]
    pub hours: Vec<String>,
    /// Extra admin account, `NAME,MOBILE,EMAIL[,PASSWORD]`.
    #[arg(long = "add-admin")]
    pub add_admins: Vec<String>,
    /// Position (from 0) of an admin to remove; applied before additions.
    #[arg(long = "remove-admin")]
    pub remove_admins: Vec<usize>,
}

#[derive(Subcommand, Debug)]
pub enum StaffAction {
    List,

    Create {
        #[command(flatten)]
        identity: StaffArgs,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
        #[command(flatten)]
        grants: GrantArgs,
    },

    Edit {
        id: StaffId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[command(flatten)]
        grants: GrantArgs,
    },

    Delete { id: StaffId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct StaffArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GrantArgs {
    /// Permission key to tick, e.g. `manageFacilities` or `facilitiesActions.create`.
    #[arg(long = "grant")]
    pub grant: Vec<String>,
    /// Permission key to untick.
    #[arg(long = "revoke")]
    pub revoke: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum LocationsAction {
    /// Branches of one facility.
    List {
        facility: FacilityId,
        #[command(flatten)]
        filter: LocationFilter,
    },
    /// Branches across all facilities.
    All {
        #[command(flatten)]
        filter: LocationFilter,
    },
    Show { id: LocationId },
    Stats { id: LocationId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationFilter {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<LocationFilter> for LocationQuery {
    fn from(f: LocationFilter) -> Self {
        LocationQuery {
            city: f.city,
            is_active: f.active,
            page: f.page,
            limit: f.limit,
        }
    }
}
