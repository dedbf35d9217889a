use careadmin_auth::StorageError;
use serde::Deserialize;
use thiserror::Error;

/// The `error` / `message` fields a failing response may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Lenient decode: a body that is not a JSON object yields empty fields.
    pub fn from_text(text: &str) -> Self {
        let mut body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
        body.error = body.error.filter(|s| !s.is_empty());
        body.message = body.message.filter(|s| !s.is_empty());
        body
    }

    fn summary(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("no details")
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response.
    #[error("API error ({status}): {}", .body.summary())]
    Api { status: u16, body: ErrorBody },

    /// 2xx response whose body reports `success: false`.
    #[error("request rejected: {}", .0.summary())]
    Rejected(ErrorBody),

    /// A 2xx body that does not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    fn body(&self) -> Option<&ErrorBody> {
        match self {
            ClientError::Api { body, .. } | ClientError::Rejected(body) => Some(body),
            _ => None,
        }
    }

    pub fn error_field(&self) -> Option<&str> {
        self.body().and_then(|b| b.error.as_deref())
    }

    pub fn message_field(&self) -> Option<&str> {
        self.body().and_then(|b| b.message.as_deref())
    }

    /// What the transport layer says about the failure.
    pub fn transport_message(&self) -> Option<String> {
        match self {
            ClientError::Network(msg) | ClientError::Parse(msg) => Some(msg.clone()),
            ClientError::Api { status, .. } => Some(format!("request failed with status code {status}")),
            ClientError::Storage(err) => Some(err.to_string()),
            ClientError::Rejected(_) => None,
        }
    }

    /// `error`, else `fallback`.
    pub fn error_or(&self, fallback: &str) -> String {
        self.error_field().unwrap_or(fallback).to_string()
    }

    /// `error`, then `message`, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.error_field()
            .or(self.message_field())
            .unwrap_or(fallback)
            .to_string()
    }

    /// `message`, then `error`, then the transport message, then `fallback`.
    pub fn detailed_message(&self, fallback: &str) -> String {
        self.message_field()
            .or(self.error_field())
            .map(str::to_string)
            .or_else(|| self.transport_message())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// `message`, then the transport message, then `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message_field()
            .map(str::to_string)
            .or_else(|| self.transport_message())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
