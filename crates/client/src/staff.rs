//! Platform staff under `/api/admin`.

use careadmin_core::{Staff, StaffId};
use serde_json::Value;

use crate::dto::{Envelope, NewStaff, StaffDetail, StaffDetailResponse, StaffListResponse, StaffUpdate};
use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    pub async fn list_staff(&self) -> Result<Vec<Staff>, ClientError> {
        let resp: StaffListResponse = self.get("/api/admin/staffs").await?;
        resp.into_staff()
    }

    pub async fn get_staff(&self, id: &StaffId) -> Result<StaffDetail, ClientError> {
        let resp: StaffDetailResponse = self.get(&format!("/api/admin/staffs/{id}")).await?;
        Ok(resp.into_detail())
    }

    pub async fn create_staff(&self, payload: &NewStaff) -> Result<(), ClientError> {
        let envelope: Envelope<Value> = self.post("/api/admin/create-staff", payload).await?;
        envelope.require_success().map(drop)
    }

    pub async fn update_staff(&self, id: &StaffId, payload: &StaffUpdate) -> Result<(), ClientError> {
        let envelope: Envelope<Value> = self
            .put(&format!("/api/admin/staffs/{id}/permissions"), payload)
            .await?;
        envelope.require_success().map(drop)
    }

    pub async fn delete_staff(&self, id: &StaffId) -> Result<(), ClientError> {
        let _: Value = self.delete(&format!("/api/admin/staffs/{id}")).await?;
        Ok(())
    }
}
