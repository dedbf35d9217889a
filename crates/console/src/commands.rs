//! Dispatch of parsed commands to pages, and rendering of their results.

use anyhow::Context;
use careadmin_core::{DomainResult, Facility, FacilityKind, Location, Staff};

use crate::app::App;
use crate::appbar;
use crate::cli::{
    Command, EditFacilityArgs, FacilitiesAction, GrantArgs, LocationsAction, NewFacilityArgs,
    StaffAction,
};
use crate::forms::facility::{parse_admin, parse_day_hours, split_list};
use crate::forms::{FacilityEditForm, NewFacilityForm, StaffForm};
use crate::pages::{facilities, facility_edit, locations, login, staff};
use crate::render::{OutputFormat, Table, fields, to_json};

pub async fn run(app: &App, command: Command, output: OutputFormat) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => app.prompt.line("Email").context("reading email")?,
            };
            let password = match password {
                Some(p) => p,
                None => app.prompt.password("Password").context("reading password")?,
            };
            login::login(app, &email, &password).await;
        }

        Command::Logout => appbar::logout(app).await,

        Command::Whoami => {
            let me = login::whoami(app);
            match output {
                OutputFormat::Json => println!("{}", to_json(&me)),
                OutputFormat::Table => {
                    println!(
                        "{}\n",
                        fields(&[
                            ("Name", me.name.clone()),
                            ("Role", me.role.clone()),
                            ("Email", me.email.clone().unwrap_or_else(|| "-".into())),
                            ("Session", if me.token { "active" } else { "none" }.into()),
                        ])
                    );
                    let mut t = Table::new(["Module", "Action", "Allowed", "Reason"]);
                    for d in &me.capabilities {
                        t.row([
                            d.module.label().to_string(),
                            d.action.as_str().to_string(),
                            yes_no(d.granted).to_string(),
                            d.reason.message().to_string(),
                        ]);
                    }
                    println!("{}", t.render());
                }
            }
        }

        Command::Facilities { action } => run_facilities(app, action, output).await?,
        Command::Staff { action } => run_staff(app, action, output).await?,
        Command::Locations { action } => run_locations(app, action, output).await,
    }
    Ok(())
}

async fn run_facilities(app: &App, action: FacilitiesAction, output: OutputFormat) -> anyhow::Result<()> {
    match action {
        FacilitiesAction::List { kind, search } => {
            let view = facilities::load(app).await;
            let query = search.unwrap_or_default();
            let kinds: Vec<FacilityKind> = kind.map(|k| vec![k]).unwrap_or_else(|| FacilityKind::ALL.to_vec());
            for kind in kinds {
                let found = view.search(kind, &query);
                match output {
                    OutputFormat::Json => println!("{}", to_json(&found)),
                    OutputFormat::Table => {
                        println!("{}s ({})", kind.label(), found.len());
                        println!("{}\n", facility_table(&found));
                    }
                }
            }
        }

        FacilitiesAction::Show { kind, id } => {
            if let Some(f) = facilities::show(app, kind, &id).await {
                print_facility(&f, output);
            }
        }

        FacilitiesAction::CreateHospital { fields, hours } => {
            let mut form = new_facility_form(app, FacilityKind::Hospital, fields)?;
            for raw in &hours {
                let Some((day, h)) = check(app, parse_day_hours(raw)) else {
                    return Ok(());
                };
                form.operating_hours.set(day, h);
            }
            create_facility(app, &form, output).await;
        }

        FacilitiesAction::CreateClinic { fields, days } => {
            let mut form = new_facility_form(app, FacilityKind::Clinic, fields)?;
            for day in days {
                if !form.days_of_operation.contains(&day) {
                    form.toggle_day(day);
                }
            }
            create_facility(app, &form, output).await;
        }

        FacilitiesAction::Edit { kind, id, changes } => {
            let Some(mut form) = facility_edit::load(app, kind, &id).await else {
                return Ok(());
            };
            if check(app, apply_edits(&mut form, changes)).is_none() {
                return Ok(());
            }
            facility_edit::save(app, &id, &form).await;
        }

        FacilitiesAction::Delete { kind, id } => {
            if let Some(remaining) = facilities::delete(app, kind, &id).await {
                let refs: Vec<&Facility> = remaining.iter().collect();
                match output {
                    OutputFormat::Json => println!("{}", to_json(&refs)),
                    OutputFormat::Table => println!("{}", facility_table(&refs)),
                }
            }
        }

        FacilitiesAction::ResetPassword { kind, id, password } => {
            let password = match password {
                Some(p) => p,
                None => app.prompt.password("New password").context("reading password")?,
            };
            facilities::reset_password(app, kind, &id, &password).await;
        }
    }
    Ok(())
}

fn new_facility_form(app: &App, kind: FacilityKind, args: NewFacilityArgs) -> anyhow::Result<NewFacilityForm> {
    let password = match args.admin_password {
        Some(p) => p,
        None => app.prompt.password("Admin password").context("reading password")?,
    };
    let mut form = NewFacilityForm::new(kind);
    form.name = args.name;
    form.registration_number = args.registration_number;
    form.email = args.email;
    form.phone = args.phone;
    form.street = args.street;
    form.city = args.city;
    form.state = args.state;
    form.pincode = args.pincode;
    form.emergency_contact = args.emergency_contact;
    form.specializations = args.specializations;
    form.super_admin_email = args.admin_email;
    form.super_admin_password = password;
    Ok(form)
}

async fn create_facility(app: &App, form: &NewFacilityForm, output: OutputFormat) {
    let Some(creds) = facilities::create(app, form).await else {
        return;
    };
    match output {
        OutputFormat::Json => println!("{}", to_json(&creds)),
        OutputFormat::Table => {
            println!("Admin credentials (shown once):");
            println!(
                "{}",
                fields(&[("Email", creds.email.clone()), ("Password", creds.password.clone())])
            );
        }
    }
}

fn apply_edits(form: &mut FacilityEditForm, c: EditFacilityArgs) -> DomainResult<()> {
    let text = [
        (c.name, &mut form.name),
        (c.registration_number, &mut form.registration_number),
        (c.email, &mut form.email),
        (c.phone, &mut form.phone),
        (c.street, &mut form.street),
        (c.city, &mut form.city),
        (c.state, &mut form.state),
        (c.pincode, &mut form.pincode),
        (c.country, &mut form.country),
        (c.established_year, &mut form.established_year),
        (c.beds, &mut form.number_of_beds),
        (c.website, &mut form.website),
        (c.description, &mut form.description),
        (c.emergency_contact, &mut form.emergency_contact),
        (c.admin_email, &mut form.super_admin_email),
        (c.admin_password, &mut form.super_admin_password),
    ];
    for (value, slot) in text {
        if let Some(v) = value {
            *slot = v;
        }
    }
    if let Some(list) = c.specializations {
        form.specializations = split_list(&list);
    }
    if let Some(s) = c.specialization {
        form.set_specialization(&s)?;
    }
    for dept in &c.toggle_departments {
        form.toggle_department(dept)?;
    }
    for tag in &c.toggle_facilities {
        form.toggle_facility(tag)?;
    }
    for day in c.toggle_days {
        form.toggle_day(day)?;
    }
    for raw in &c.hours {
        let (day, hours) = parse_day_hours(raw)?;
        form.set_hours(day, hours)?;
    }
    let mut removals = c.remove_admins;
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        form.remove_admin(index)?;
    }
    for raw in &c.add_admins {
        form.add_admin(parse_admin(raw)?);
    }
    Ok(())
}

async fn run_staff(app: &App, action: StaffAction, output: OutputFormat) -> anyhow::Result<()> {
    match action {
        StaffAction::List => {
            let view = staff::list(app).await;
            match output {
                OutputFormat::Json => println!("{}", to_json(&view.staff)),
                OutputFormat::Table => println!("{}", staff_table(&view.staff)),
            }
        }

        StaffAction::Create { identity, password, grants } => {
            let password = match password {
                Some(p) => p,
                None => app.prompt.password("Password").context("reading password")?,
            };
            let mut form = StaffForm::for_create();
            form.name = identity.name;
            form.email = identity.email;
            form.phone = identity.phone;
            form.password = password;
            if check(app, apply_grants(&mut form, &grants)).is_none() {
                return Ok(());
            }
            staff::create(app, &form).await;
        }

        StaffAction::Edit { id, name, email, phone, grants } => {
            let Some(mut form) = staff::load(app, &id).await else {
                return Ok(());
            };
            if let Some(v) = name {
                form.name = v;
            }
            if let Some(v) = email {
                form.email = v;
            }
            if let Some(v) = phone {
                form.phone = v;
            }
            if check(app, apply_grants(&mut form, &grants)).is_none() {
                return Ok(());
            }
            staff::save(app, &id, &form).await;
        }

        StaffAction::Delete { id } => {
            let mut view = staff::list(app).await;
            if staff::delete(app, &mut view, &id).await && output == OutputFormat::Table {
                println!("{}", staff_table(&view.staff));
            }
        }
    }
    Ok(())
}

fn apply_grants(form: &mut StaffForm, grants: &GrantArgs) -> DomainResult<()> {
    for key in &grants.grant {
        form.set_permission(key, true)?;
    }
    for key in &grants.revoke {
        form.set_permission(key, false)?;
    }
    Ok(())
}

async fn run_locations(app: &App, action: LocationsAction, output: OutputFormat) {
    match action {
        LocationsAction::List { facility, filter } => {
            if let Some(list) = locations::by_facility(app, &facility, &filter.into()).await {
                print_locations(&list, output);
            }
        }
        LocationsAction::All { filter } => {
            if let Some(list) = locations::all(app, &filter.into()).await {
                print_locations(&list, output);
            }
        }
        LocationsAction::Show { id } => {
            if let Some(loc) = locations::show(app, &id).await {
                match output {
                    OutputFormat::Json => println!("{}", to_json(&loc)),
                    OutputFormat::Table => println!("{}", location_fields(&loc)),
                }
            }
        }
        LocationsAction::Stats { id } => {
            if let Some(stats) = locations::stats(app, &id).await {
                println!("{}", to_json(&stats));
            }
        }
    }
}

/// Toast a local validation failure.
fn check<T>(app: &App, result: DomainResult<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(err) => {
            app.toasts.error(err.to_string());
            None
        }
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

fn facility_table(list: &[&Facility]) -> String {
    if list.is_empty() {
        return "No facilities found.".to_string();
    }
    let mut t = Table::new(["ID", "Name", "Registration", "City", "Phone", "Email"]);
    for f in list {
        t.row([
            f.id.to_string(),
            f.name.clone(),
            f.registration_number.clone(),
            f.address.city.clone(),
            f.phone.clone(),
            f.email.clone(),
        ]);
    }
    t.render()
}

fn print_facility(f: &Facility, output: OutputFormat) {
    if output == OutputFormat::Json {
        println!("{}", to_json(f));
        return;
    }
    let mut pairs = vec![
        ("ID", f.id.to_string()),
        ("Name", f.name.clone()),
        ("Registration", f.registration_number.clone()),
        ("Email", f.email.clone()),
        ("Phone", f.phone.clone()),
        ("Address", f.address.to_string()),
    ];
    if let Some(hours) = &f.operating_hours {
        let days: Vec<String> = hours.iter().map(|(d, h)| format!("{} {h}", d.short())).collect();
        pairs.push(("Hours", days.join(", ")));
    }
    if !f.days_of_operation.is_empty() {
        let days: Vec<&str> = f.days_of_operation.iter().map(|d| d.short()).collect();
        pairs.push(("Days", days.join(", ")));
    }
    if !f.specializations.is_empty() {
        pairs.push(("Specializations", f.specializations.join(", ")));
    }
    if !f.departments.is_empty() {
        pairs.push(("Departments", f.departments.join(", ")));
    }
    if !f.facilities.is_empty() {
        pairs.push(("Facilities", f.facilities.join(", ")));
    }
    println!("{}", fields(&pairs));
}

fn staff_table(list: &[Staff]) -> String {
    if list.is_empty() {
        return "No platform staff found.".to_string();
    }
    let mut t = Table::new(["ID", "Name", "Email", "Phone", "Status", "Permissions"]);
    for s in list {
        let perms = s
            .permissions
            .as_ref()
            .map(|p| p.display_lines().join(", "))
            .unwrap_or_default();
        t.row([
            s.id.to_string(),
            s.name.clone(),
            s.email.clone(),
            s.phone.clone().unwrap_or_default(),
            s.status_label().to_string(),
            perms,
        ]);
    }
    t.render()
}

fn print_locations(list: &[Location], output: OutputFormat) {
    if output == OutputFormat::Json {
        println!("{}", to_json(list));
        return;
    }
    if list.is_empty() {
        println!("No locations found.");
        return;
    }
    let mut t = Table::new(["ID", "Branch", "Code", "City", "Main", "Active"]);
    for l in list {
        t.row([
            l.id.to_string(),
            l.branch_name.clone(),
            l.branch_code.clone(),
            l.address.city.clone(),
            yes_no(l.is_main_branch).to_string(),
            yes_no(l.is_active).to_string(),
        ]);
    }
    println!("{}", t.render());
}

fn location_fields(l: &Location) -> String {
    fields(&[
        ("ID", l.id.to_string()),
        ("Branch", l.branch_name.clone()),
        ("Code", l.branch_code.clone()),
        ("Facility", format!("{} ({})", l.facility_id, l.facility_type)),
        ("Address", l.address.to_string()),
        ("Phone", l.phone.clone()),
        ("Doctors", l.total_doctors.to_string()),
        ("Support staff", l.total_support_staff.to_string()),
        ("Active", yes_no(l.is_active).to_string()),
    ])
}
