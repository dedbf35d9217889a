//! `/api/admin/login` and `/api/admin/logout`.

use careadmin_auth::AdminIdentity;
use serde_json::Value;

use crate::dto::{Envelope, LoginData, LoginRequest};
use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// Authenticate. The server sets the token cookie on success; the
    /// returned identity is `None` when the response carries no `admin`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<AdminIdentity>, ClientError> {
        let envelope: Envelope<LoginData> = self
            .post("/api/admin/login", &LoginRequest { email, password })
            .await?;
        let data = envelope.require_success()?;
        Ok(data.and_then(|d| d.admin))
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: Value = self.post("/api/admin/logout", &serde_json::json!({})).await?;
        Ok(())
    }
}
