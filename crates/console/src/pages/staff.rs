//! Platform staff: list, create, edit, delete.

use careadmin_auth::Module;
use careadmin_client::ClientError;
use careadmin_core::{Entity, Staff, StaffId};

use crate::app::App;
use crate::forms::StaffForm;

pub const ROUTE: &str = "/platform-staffs";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffListView {
    pub staff: Vec<Staff>,
    pub error: Option<String>,
    /// Whether create/edit controls are offered.
    pub can_manage: bool,
}

impl StaffListView {
    /// Drop a deleted entry without re-fetching.
    pub fn remove(&mut self, id: &StaffId) {
        self.staff.retain(|s| s.id() != id);
    }
}

pub async fn list(app: &App) -> StaffListView {
    app.navigate(ROUTE);
    let can_manage = careadmin_auth::has_module(app.permissions().as_ref(), Module::PlatformStaffs);

    match app.client.list_staff().await {
        Ok(staff) => StaffListView {
            staff,
            error: None,
            can_manage,
        },
        Err(err) => {
            tracing::error!(error = %err, "could not list staff");
            let msg = err.message_or("Failed to load platform staffs");
            app.toasts.error(msg.clone());
            StaffListView {
                staff: Vec::new(),
                error: Some(msg),
                can_manage,
            }
        }
    }
}

pub async fn create(app: &App, form: &StaffForm) -> bool {
    if app.require_module(Module::PlatformStaffs).is_err() {
        return false;
    }
    let payload = match form.to_new_staff() {
        Ok(p) => p,
        Err(err) => {
            app.toasts.error(err.to_string());
            return false;
        }
    };

    match app.client.create_staff(&payload).await {
        Ok(()) => {
            tracing::info!(email = %payload.email, "staff created");
            app.toasts.success("Platform Staff created!");
            app.navigate(ROUTE);
            true
        }
        Err(ClientError::Rejected(body)) => {
            app.toasts
                .error(body.error.unwrap_or_else(|| "Failed to create staff.".to_string()));
            false
        }
        Err(err) => {
            tracing::error!(error = %err, "could not create staff");
            app.toasts.error(err.error_or("Failed to create staff. Please try again."));
            false
        }
    }
}

/// Fetch a record into an edit form.
pub async fn load(app: &App, id: &StaffId) -> Option<StaffForm> {
    app.navigate(&format!("{ROUTE}/edit/{id}"));
    if app.require_module(Module::PlatformStaffs).is_err() {
        return None;
    }

    match app.client.get_staff(id).await {
        Ok(detail) => Some(StaffForm::for_edit(&detail)),
        Err(err) => {
            tracing::error!(%id, error = %err, "could not fetch staff");
            app.toasts.error(err.detailed_message("Failed to fetch staff data"));
            None
        }
    }
}

pub async fn save(app: &App, id: &StaffId, form: &StaffForm) -> bool {
    if app.require_module(Module::PlatformStaffs).is_err() {
        return false;
    }
    let payload = match form.to_update() {
        Ok(p) => p,
        Err(err) => {
            app.toasts.error(err.to_string());
            return false;
        }
    };

    match app.client.update_staff(id, &payload).await {
        Ok(()) => {
            tracing::info!(%id, "staff updated");
            app.toasts.success("Platform Staff updated!");
            app.navigate(ROUTE);
            true
        }
        Err(err @ ClientError::Rejected(_)) => {
            app.toasts.error(err.detailed_message("Failed to update staff."));
            false
        }
        Err(err) => {
            tracing::error!(%id, error = %err, "could not update staff");
            app.toasts
                .error(err.detailed_message("Failed to update staff. Please try again."));
            false
        }
    }
}

/// Confirm and delete; on success the entry is removed from `view`.
pub async fn delete(app: &App, view: &mut StaffListView, id: &StaffId) -> bool {
    if !app.prompt.confirm("Are you sure you want to delete this staff member?") {
        return false;
    }

    match app.client.delete_staff(id).await {
        Ok(()) => {
            tracing::info!(%id, "staff deleted");
            view.remove(id);
            app.toasts.success("Platform staff deleted.");
            true
        }
        Err(err) => {
            tracing::error!(%id, error = %err, "could not delete staff");
            app.toasts.error(err.message_or("Failed to delete staff."));
            false
        }
    }
}
