//! Application state shared by every page.

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use careadmin_auth::{
    AuthContext, AuthzError, FileStorage, LocalStorage, Module, PermissionSet, authorize_module,
};
use careadmin_client::{ApiClient, ClientConfig, ClientError};

use crate::toast::Toaster;

/// Interactive input. Pages never read the terminal directly.
pub trait Prompt: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
    fn password(&self, label: &str) -> std::io::Result<String>;
    fn line(&self, label: &str) -> std::io::Result<String>;
}

/// Terminal prompts; `assume_yes` answers every confirmation with yes.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    pub assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{question} [y/N]: ");
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("y")
    }

    fn password(&self, label: &str) -> std::io::Result<String> {
        rpassword::prompt_password(format!("{label}: "))
    }

    fn line(&self, label: &str) -> std::io::Result<String> {
        eprint!("{label}: ");
        std::io::stderr().flush()?;
        let mut s = String::new();
        std::io::stdin().lock().read_line(&mut s)?;
        Ok(s.trim().to_string())
    }
}

pub struct App {
    pub client: ApiClient,
    pub storage: Arc<dyn LocalStorage>,
    pub auth: AuthContext<Arc<dyn LocalStorage>>,
    pub toasts: Toaster,
    pub prompt: Box<dyn Prompt>,
    route: Mutex<String>,
}

impl App {
    pub fn new(
        client: ApiClient,
        storage: Arc<dyn LocalStorage>,
        toasts: Toaster,
        prompt: Box<dyn Prompt>,
    ) -> Self {
        let auth = AuthContext::init(storage.clone());
        Self {
            client,
            storage,
            auth,
            toasts,
            prompt,
            route: Mutex::new("/".to_string()),
        }
    }

    /// App for the configured context: file storage and cookie jar under the
    /// data directory.
    pub fn from_config(config: &ClientConfig, prompt: Box<dyn Prompt>) -> Result<Self, ClientError> {
        let client = ApiClient::from_config(config)?;
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(config.storage_path()));
        Ok(Self::new(client, storage, Toaster::new(true), prompt))
    }

    pub fn navigate(&self, route: &str) {
        tracing::debug!(%route, "navigate");
        *self.route.lock().unwrap_or_else(|e| e.into_inner()) = route.to_string();
    }

    pub fn route(&self) -> String {
        self.route.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn permissions(&self) -> Option<PermissionSet> {
        self.auth.permissions()
    }

    /// Gate a whole area on its module flag; a denial is toasted and
    /// returned.
    pub fn require_module(&self, module: Module) -> Result<(), AuthzError> {
        let result = authorize_module(self.permissions().as_ref(), module);
        if let Err(err) = &result {
            self.toasts.error(denial_message(err));
        }
        result
    }
}

fn denial_message(err: &AuthzError) -> String {
    match err {
        AuthzError::Anonymous => "Please log in first.".to_string(),
        AuthzError::ModuleDisabled(module) => {
            format!("You do not have access to {}.", module.label())
        }
        AuthzError::UnknownPermission(key) => format!("Unknown permission '{key}'."),
    }
}
