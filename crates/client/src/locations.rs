//! Read-only location endpoints under `/api/locations`.

use careadmin_core::{FacilityId, Location, LocationId, LocationQuery, LocationStats};

use crate::dto::Wrapped;
use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    pub async fn locations_by_facility(
        &self,
        facility: &FacilityId,
        query: &LocationQuery,
    ) -> Result<Vec<Location>, ClientError> {
        let resp: Wrapped<Vec<Location>> = self
            .get_with_query(&format!("/api/locations/facility/{facility}"), query)
            .await?;
        Ok(resp.into_inner())
    }

    pub async fn all_locations(&self, query: &LocationQuery) -> Result<Vec<Location>, ClientError> {
        let resp: Wrapped<Vec<Location>> = self.get_with_query("/api/locations/all", query).await?;
        Ok(resp.into_inner())
    }

    pub async fn get_location(&self, id: &LocationId) -> Result<Location, ClientError> {
        let resp: Wrapped<Location> = self.get(&format!("/api/locations/{id}")).await?;
        Ok(resp.into_inner())
    }

    /// Statistics document; its layout is owned by the server.
    pub async fn location_stats(&self, id: &LocationId) -> Result<LocationStats, ClientError> {
        let resp: Wrapped<LocationStats> = self.get(&format!("/api/locations/{id}/stats")).await?;
        Ok(resp.into_inner())
    }
}
