//! Typed HTTP client for the facility platform API.
//!
//! One [`ApiClient`] is shared by every page. It picks its base URL from the
//! execution context, attaches the `adminToken` cookie as a bearer token, and
//! sends each request exactly once.

pub mod auth;
pub mod config;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod facilities;
pub mod http;
pub mod locations;
pub mod staff;

pub use config::{ClientConfig, ExecutionContext};
pub use cookies::{CookieJar, CookieStore, TOKEN_COOKIE};
pub use error::{ClientError, ErrorBody};
pub use http::ApiClient;
