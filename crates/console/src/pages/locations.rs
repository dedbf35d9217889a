//! Read-only branch listings.

use careadmin_core::{FacilityId, Location, LocationId, LocationQuery, LocationStats};

use crate::app::App;

pub async fn by_facility(app: &App, facility: &FacilityId, query: &LocationQuery) -> Option<Vec<Location>> {
    app.navigate(&format!("/locations/facility/{facility}"));
    match app.client.locations_by_facility(facility, query).await {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::error!(%facility, error = %err, "could not list locations");
            app.toasts.error(err.user_message("Failed to fetch locations"));
            None
        }
    }
}

pub async fn all(app: &App, query: &LocationQuery) -> Option<Vec<Location>> {
    app.navigate("/locations");
    match app.client.all_locations(query).await {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::error!(error = %err, "could not list locations");
            app.toasts.error(err.user_message("Failed to fetch locations"));
            None
        }
    }
}

pub async fn show(app: &App, id: &LocationId) -> Option<Location> {
    match app.client.get_location(id).await {
        Ok(loc) => Some(loc),
        Err(err) => {
            tracing::error!(%id, error = %err, "could not load location");
            app.toasts.error(err.user_message("Failed to fetch location"));
            None
        }
    }
}

pub async fn stats(app: &App, id: &LocationId) -> Option<LocationStats> {
    match app.client.location_stats(id).await {
        Ok(stats) => Some(stats),
        Err(err) => {
            tracing::error!(%id, error = %err, "could not load location stats");
            app.toasts.error(err.user_message("Failed to fetch location stats"));
            None
        }
    }
}
