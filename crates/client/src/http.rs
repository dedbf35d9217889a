//! Shared HTTP client: base URL, bearer token from the cookie jar, JSON in
//! and out. Every call is sent once; there is no retry and no cache.

use std::sync::Arc;

use careadmin_observability::{RequestId, request_id};
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use crate::config::ClientConfig;
use crate::cookies::{CookieJar, CookieStore, TOKEN_COOKIE};
use crate::error::{ClientError, ErrorBody};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cookies: Arc<dyn CookieStore>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, cookies: Arc<dyn CookieStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookies,
        })
    }

    /// Client for the configured context, with the cookie jar under the
    /// data directory.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let jar = CookieJar::open(config.cookie_path())?;
        Self::new(config.base_url(), Arc::new(jar))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cookies(&self) -> &Arc<dyn CookieStore> {
        &self.cookies
    }

    pub fn is_authenticated(&self) -> bool {
        self.cookies.get(TOKEN_COOKIE).is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.cookies.get(TOKEN_COOKIE) {
            req = req.bearer_auth(token);
        }
        if let Some(cookie) = self.cookies.header() {
            req = req.header(COOKIE, cookie);
        }
        req
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Method::GET, path, self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, req).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, req).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::PUT, path).json(body);
        self.execute(Method::PUT, path, req).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Method::DELETE, path, self.request(Method::DELETE, path))
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, ClientError> {
        let id = RequestId::new();
        let span = tracing::info_span!("api_request", request_id = %id, %method, path);

        async move {
            let resp = req
                .header(request_id::HEADER, id.to_string())
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "request failed");
                    ClientError::Network(e.to_string())
                })?;

            for value in resp.headers().get_all(SET_COOKIE) {
                if let Ok(raw) = value.to_str() {
                    self.cookies.record_set_cookie(raw);
                }
            }

            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;

            if !status.is_success() {
                tracing::info!(status = status.as_u16(), "request returned an error status");
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    body: ErrorBody::from_text(&text),
                });
            }
            tracing::debug!(status = status.as_u16(), "request completed");

            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            serde_json::from_str(text).map_err(|e| ClientError::Parse(e.to_string()))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_with_and_without_leading_slash() {
        let c = ApiClient::new("https://api.example.com/", Arc::new(CookieJar::in_memory())).unwrap();
        assert_eq!(c.url("/api/admin/login"), "https://api.example.com/api/admin/login");
        assert_eq!(c.url("api/admin/logout"), "https://api.example.com/api/admin/logout");
    }

    #[test]
    fn authenticated_iff_token_cookie_present() {
        let jar = Arc::new(CookieJar::in_memory());
        let c = ApiClient::new("http://localhost", jar.clone()).unwrap();
        assert!(!c.is_authenticated());
        jar.set(TOKEN_COOKIE, "t");
        assert!(c.is_authenticated());
    }
}
