//! Client configuration from the environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `API_BASE_URL` | base URL in the server context |
//! | `CAREADMIN_PUBLIC_API_URL` | base URL in the browser context |
//! | `CAREADMIN_CONTEXT` | `server` or `browser` (default `browser`) |
//! | `CAREADMIN_HOME` | data directory (default `~/.careadmin`) |

use std::path::PathBuf;

use careadmin_core::DomainError;

pub const SERVER_URL_ENV: &str = "API_BASE_URL";
pub const PUBLIC_URL_ENV: &str = "CAREADMIN_PUBLIC_API_URL";
pub const CONTEXT_ENV: &str = "CAREADMIN_CONTEXT";
pub const HOME_ENV: &str = "CAREADMIN_HOME";

/// Where the client runs; selects which base URL applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    Server,
    /// Interactive use on an operator's machine.
    #[default]
    Browser,
}

impl core::str::FromStr for ExecutionContext {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(ExecutionContext::Server),
            "browser" | "console" => Ok(ExecutionContext::Browser),
            other => Err(DomainError::validation(format!(
                "unknown execution context '{other}' (expected server or browser)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub context: ExecutionContext,
    pub server_base_url: Option<String>,
    pub public_base_url: Option<String>,
    pub home: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let context = match get(CONTEXT_ENV) {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to browser context");
                ExecutionContext::Browser
            }),
            None => ExecutionContext::Browser,
        };

        Self {
            context,
            server_base_url: get(SERVER_URL_ENV),
            public_base_url: get(PUBLIC_URL_ENV),
            home: get(HOME_ENV).map(PathBuf::from).unwrap_or_else(default_home),
        }
    }

    /// Base URL for the active context, or `""` when none is configured.
    pub fn base_url(&self) -> &str {
        let url = match self.context {
            ExecutionContext::Server => self.server_base_url.as_deref(),
            ExecutionContext::Browser => self.public_base_url.as_deref(),
        };
        url.unwrap_or("")
    }

    pub fn storage_path(&self) -> PathBuf {
        self.home.join("storage.json")
    }

    pub fn cookie_path(&self) -> PathBuf {
        self.home.join("cookies.json")
    }
}

/// `~/.careadmin`, or `./.careadmin` when no home directory is known.
pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".careadmin")
}
