//! Sign-in screen and the `whoami` summary.

use careadmin_auth::{AdminIdentity, Decision, Profile, capability_matrix};
use careadmin_client::ClientError;
use serde::Serialize;

use crate::app::App;

pub const ROUTE: &str = "/login";

/// Submit credentials. On success the profile cache and identity are
/// stored and the app moves to `/`.
pub async fn login(app: &App, email: &str, password: &str) -> bool {
    app.navigate(ROUTE);

    if email.trim().is_empty() || password.is_empty() {
        app.toasts.error("Email and password are required");
        return false;
    }

    match app.client.login(email.trim(), password).await {
        Ok(admin) => {
            if let Some(admin) = admin {
                remember(app, admin);
            } else {
                tracing::warn!("login succeeded without an admin record");
            }
            app.toasts.success("Logged in successfully");
            app.navigate("/");
            true
        }
        Err(ClientError::Rejected(body)) => {
            let msg = body.error.unwrap_or_else(|| "Invalid credentials".to_string());
            app.toasts.error(msg);
            false
        }
        Err(err) => {
            tracing::error!(error = %err, "login request failed");
            app.toasts
                .error(err.error_or("Login failed. Please check your credentials and try again."));
            false
        }
    }
}

fn remember(app: &App, admin: AdminIdentity) {
    let role = admin.role.as_ref().map(|r| r.as_str().to_string());
    if let Err(err) = Profile::store(&app.storage, &admin.name, role.as_deref()) {
        tracing::warn!(error = %err, "could not cache profile");
    }
    if let Err(err) = app.auth.login(admin) {
        tracing::warn!(error = %err, "could not persist identity");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WhoAmI {
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    /// Whether a session token is held.
    pub token: bool,
    pub capabilities: Vec<Decision>,
}

pub fn whoami(app: &App) -> WhoAmI {
    let profile = Profile::load(&app.storage);
    let user = app.auth.user();
    let permissions = user.as_ref().and_then(|u| u.permissions.clone());
    WhoAmI {
        name: profile.name,
        role: profile.role,
        email: user.map(|u| u.email).filter(|e| !e.is_empty()),
        token: app.client.is_authenticated(),
        capabilities: capability_matrix(permissions.as_ref()),
    }
}
