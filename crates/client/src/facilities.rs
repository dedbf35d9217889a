//! Hospital and clinic CRUD under `/api/facilities`.

use careadmin_core::{Facility, FacilityId, FacilityKind};
use serde_json::Value;

use crate::dto::{DataList, FacilityCreated, FacilityUpdate, NewFacility, PasswordReset, Wrapped};
use crate::error::ClientError;
use crate::http::ApiClient;

fn collection_path(kind: FacilityKind) -> String {
    format!("/api/facilities/{}", kind.collection())
}

fn item_path(kind: FacilityKind, id: &FacilityId) -> String {
    format!("/api/facilities/{}/{}", kind.collection(), id)
}

impl ApiClient {
    pub async fn list_facilities(&self, kind: FacilityKind) -> Result<Vec<Facility>, ClientError> {
        let list: DataList<Facility> = self.get(&collection_path(kind)).await?;
        Ok(list.into_vec())
    }

    pub async fn get_facility(&self, kind: FacilityKind, id: &FacilityId) -> Result<Facility, ClientError> {
        let facility: Wrapped<Facility> = self.get(&item_path(kind, id)).await?;
        Ok(facility.into_inner())
    }

    pub async fn create_facility(
        &self,
        kind: FacilityKind,
        payload: &NewFacility,
    ) -> Result<FacilityCreated, ClientError> {
        self.post(&collection_path(kind), payload).await
    }

    pub async fn update_facility(
        &self,
        kind: FacilityKind,
        id: &FacilityId,
        payload: &FacilityUpdate,
    ) -> Result<(), ClientError> {
        let _: Value = self.put(&item_path(kind, id), payload).await?;
        Ok(())
    }

    pub async fn reset_facility_password(
        &self,
        kind: FacilityKind,
        id: &FacilityId,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let body = PasswordReset {
            super_admin_password: new_password,
        };
        let _: Value = self.put(&item_path(kind, id), &body).await?;
        Ok(())
    }

    pub async fn delete_facility(&self, kind: FacilityKind, id: &FacilityId) -> Result<(), ClientError> {
        let _: Value = self.delete(&item_path(kind, id)).await?;
        Ok(())
    }
}
