//! Edit page for a single hospital or clinic.

use careadmin_core::{FacilityId, FacilityKind};

use crate::app::App;
use crate::forms::FacilityEditForm;

pub fn route(kind: FacilityKind, id: &FacilityId) -> String {
    format!("/facilities/edit/{}/{}", kind.as_str(), id)
}

/// Fetch the record and mirror it into a form. On failure the user is
/// sent back to the list.
pub async fn load(app: &App, kind: FacilityKind, id: &FacilityId) -> Option<FacilityEditForm> {
    app.navigate(&route(kind, id));
    match app.client.get_facility(kind, id).await {
        Ok(facility) => Some(FacilityEditForm::from_facility(kind, &facility)),
        Err(err) => {
            tracing::error!(%id, error = %err, "could not load facility for editing");
            app.toasts.error("Failed to load facility details");
            app.navigate(super::facilities::ROUTE);
            None
        }
    }
}

pub async fn save(app: &App, id: &FacilityId, form: &FacilityEditForm) -> bool {
    let payload = match form.to_payload() {
        Ok(p) => p,
        Err(err) => {
            app.toasts.error(err.to_string());
            return false;
        }
    };

    match app.client.update_facility(form.kind, id, &payload).await {
        Ok(()) => {
            tracing::info!(kind = form.kind.as_str(), %id, "facility updated");
            app.toasts.success(format!("{} updated successfully!", form.kind.label()));
            app.navigate(super::facilities::ROUTE);
            true
        }
        Err(err) => {
            tracing::error!(%id, error = %err, "could not update facility");
            app.toasts.error(err.user_message("Failed to update facility"));
            false
        }
    }
}
