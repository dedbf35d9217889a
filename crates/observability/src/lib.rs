//! Tracing setup and request correlation shared by the console and client.

/// Initialize process-wide tracing with the format named by
/// `CAREADMIN_LOG_FORMAT` (JSON unless it says `pretty`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Subscriber configuration (filters, formats).
pub mod tracing;

/// Correlation ids for outbound requests.
pub mod request_id;

pub use request_id::RequestId;
pub use tracing::{LogFormat, LogFormatError};
