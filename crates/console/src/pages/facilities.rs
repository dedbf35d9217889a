//! Hospitals and clinics: list, search, create, delete, reset password.

use careadmin_client::ClientError;
use careadmin_core::{Facility, FacilityCredentials, FacilityId, FacilityKind};

use crate::app::App;
use crate::forms::NewFacilityForm;
use crate::forms::facility::validate_password;

pub const ROUTE: &str = "/facilities";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilitiesView {
    pub hospitals: Vec<Facility>,
    pub clinics: Vec<Facility>,
}

impl FacilitiesView {
    pub fn list(&self, kind: FacilityKind) -> &[Facility] {
        match kind {
            FacilityKind::Hospital => &self.hospitals,
            FacilityKind::Clinic => &self.clinics,
        }
    }

    /// Entries of `kind` whose name or registration number contains `query`.
    pub fn search(&self, kind: FacilityKind, query: &str) -> Vec<&Facility> {
        self.list(kind).iter().filter(|f| f.matches_query(query)).collect()
    }
}

fn fetch_failed(kind: FacilityKind) -> &'static str {
    match kind {
        FacilityKind::Hospital => "Failed to fetch hospitals",
        FacilityKind::Clinic => "Failed to fetch clinics",
    }
}

/// Apply one list response; a failure is toasted and leaves the list empty.
fn settle(app: &App, kind: FacilityKind, result: Result<Vec<Facility>, ClientError>) -> Vec<Facility> {
    match result {
        Ok(list) => {
            tracing::debug!(kind = kind.as_str(), count = list.len(), "facilities loaded");
            list
        }
        Err(err) => {
            tracing::error!(kind = kind.as_str(), error = %err, "could not list facilities");
            app.toasts.error(fetch_failed(kind));
            Vec::new()
        }
    }
}

/// Load both lists concurrently. Each completes independently.
///
/// Dropping the returned future abandons both requests.
pub async fn load(app: &App) -> FacilitiesView {
    app.navigate(ROUTE);
    let (hospitals, clinics) = tokio::join!(
        app.client.list_facilities(FacilityKind::Hospital),
        app.client.list_facilities(FacilityKind::Clinic),
    );
    FacilitiesView {
        hospitals: settle(app, FacilityKind::Hospital, hospitals),
        clinics: settle(app, FacilityKind::Clinic, clinics),
    }
}

/// Re-fetch a single list.
pub async fn refresh(app: &App, kind: FacilityKind) -> Vec<Facility> {
    let result = app.client.list_facilities(kind).await;
    settle(app, kind, result)
}

pub async fn show(app: &App, kind: FacilityKind, id: &FacilityId) -> Option<Facility> {
    match app.client.get_facility(kind, id).await {
        Ok(facility) => Some(facility),
        Err(err) => {
            tracing::error!(%id, error = %err, "could not load facility");
            app.toasts.error(err.user_message("Failed to load facility details"));
            None
        }
    }
}

/// Submit the create dialog. Returns the generated admin credentials, which
/// the server shows only once.
pub async fn create(app: &App, form: &NewFacilityForm) -> Option<FacilityCredentials> {
    let kind = form.kind;
    let payload = match form.to_payload() {
        Ok(p) => p,
        Err(err) => {
            app.toasts.error(err.to_string());
            return None;
        }
    };

    match app.client.create_facility(kind, &payload).await {
        Ok(created) => {
            tracing::info!(kind = kind.as_str(), name = %payload.name, "facility created");
            app.toasts.success(format!("{} created successfully!", kind.label()));
            if created.credentials.is_none() {
                tracing::warn!("create response carried no credentials");
            }
            created.credentials
        }
        Err(err) => {
            tracing::error!(kind = kind.as_str(), error = %err, "could not create facility");
            let fallback = format!("Failed to create {}", kind.as_str());
            app.toasts.error(err.user_message(&fallback));
            None
        }
    }
}

/// Confirm, delete, then return the refreshed list of that kind.
pub async fn delete(app: &App, kind: FacilityKind, id: &FacilityId) -> Option<Vec<Facility>> {
    let question = format!("Are you sure you want to delete this {}?", kind.as_str());
    if !app.prompt.confirm(&question) {
        return None;
    }

    match app.client.delete_facility(kind, id).await {
        Ok(()) => {
            tracing::info!(kind = kind.as_str(), %id, "facility deleted");
            app.toasts.success(format!("{} deleted successfully", kind.label()));
            Some(refresh(app, kind).await)
        }
        Err(err) => {
            tracing::error!(%id, error = %err, "could not delete facility");
            app.toasts.error(err.error_or(&format!("Failed to delete {}", kind.as_str())));
            None
        }
    }
}

pub async fn reset_password(app: &App, kind: FacilityKind, id: &FacilityId, new_password: &str) -> bool {
    if let Err(err) = validate_password(new_password) {
        app.toasts.error(err.to_string());
        return false;
    }

    match app.client.reset_facility_password(kind, id, new_password).await {
        Ok(()) => {
            tracing::info!(%id, "facility admin password reset");
            app.toasts.success("Password reset successfully!");
            true
        }
        Err(err) => {
            tracing::error!(%id, error = %err, "could not reset password");
            app.toasts.error(err.user_message("Failed to reset password"));
            false
        }
    }
}
