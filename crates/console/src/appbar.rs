//! Navigation chrome shown above every page except the sign-in screens.

use careadmin_auth::{LocalStorage, Profile};

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { id: "home", label: "Home", href: "/" },
    NavItem { id: "staff", label: "Manage Staff", href: "/staff" },
    NavItem { id: "appointments", label: "Appointments", href: "/appointments" },
    NavItem { id: "reports", label: "Reports", href: "/reports" },
    NavItem { id: "settings", label: "Settings", href: "/settings" },
];

pub const HIDDEN_ON: &[&str] = &["/login", "/signup"];

/// Id of the first nav item whose href matches `path`; `/` matches only
/// exactly, the rest by prefix. Defaults to `home`.
pub fn active_tab(path: &str) -> &'static str {
    NAV_ITEMS
        .iter()
        .find(|item| {
            if item.href == "/" {
                path == "/"
            } else {
                path.starts_with(item.href)
            }
        })
        .map(|item| item.id)
        .unwrap_or("home")
}

pub fn is_visible(path: &str) -> bool {
    !HIDDEN_ON.contains(&path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBar {
    pub profile: Profile,
    pub active: &'static str,
}

impl AppBar {
    /// `None` on routes where the bar is hidden.
    pub fn mount(storage: &(impl LocalStorage + ?Sized), path: &str) -> Option<Self> {
        if !is_visible(path) {
            return None;
        }
        Some(Self {
            profile: Profile::load(storage),
            active: active_tab(path),
        })
    }

    pub fn render(&self) -> String {
        let tabs: Vec<String> = NAV_ITEMS
            .iter()
            .map(|item| {
                if item.id == self.active {
                    format!("[{}]", item.label)
                } else {
                    item.label.to_string()
                }
            })
            .collect();
        format!(
            "Healthcare Admin | {} | {} {} ({})",
            tabs.join("  "),
            self.profile.initials(),
            self.profile.name,
            self.profile.role
        )
    }
}

/// Sign out: tell the server, then forget the cached profile and identity
/// whatever it answered, and go to `/login`.
pub async fn logout(app: &App) {
    let result = app.client.logout().await;

    if let Err(err) = Profile::clear(&app.storage) {
        tracing::warn!(error = %err, "could not clear cached profile");
    }
    if let Err(err) = app.auth.logout() {
        tracing::warn!(error = %err, "could not clear stored identity");
    }

    match result {
        Ok(()) => app.toasts.success("Logged out successfully"),
        Err(err) => app.toasts.error(err.error_or("Logout failed. Please try again.")),
    }
    app.navigate("/login");
}

#[cfg(test)]
mod tests {
    use super::*;
    use careadmin_auth::MemoryStorage;

    #[test]
    fn active_tab_matches_prefixes() {
        assert_eq!(active_tab("/"), "home");
        assert_eq!(active_tab("/staff"), "staff");
        assert_eq!(active_tab("/staff/42"), "staff");
        assert_eq!(active_tab("/reports/monthly"), "reports");
        assert_eq!(active_tab("/facilities"), "home");
        assert_eq!(active_tab("/platform-staffs"), "home");
    }

    #[test]
    fn hidden_on_sign_in_routes() {
        let storage = MemoryStorage::new();
        assert!(AppBar::mount(&storage, "/login").is_none());
        assert!(AppBar::mount(&storage, "/signup").is_none());
        assert!(AppBar::mount(&storage, "/login/help").is_some());
    }

    #[test]
    fn renders_profile_with_defaults() {
        let storage = MemoryStorage::new();
        let bar = AppBar::mount(&storage, "/settings").unwrap();
        let line = bar.render();
        assert!(line.contains("[Settings]"));
        assert!(line.ends_with("AD Admin User (User)"));
    }
}
