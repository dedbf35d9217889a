//! Transient user notifications.
//!
//! Every toast is logged; when echo is on it is also written to stderr so
//! stdout keeps only command output.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Toaster {
    echo: bool,
    shown: Mutex<Vec<Toast>>,
}

impl Toaster {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Level::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&self, level: Level, message: String) {
        match level {
            Level::Success => tracing::info!(toast = %message, "success"),
            Level::Error => tracing::warn!(toast = %message, "error"),
        }
        if self.echo {
            let mark = if level == Level::Success { "✓" } else { "✗" };
            eprintln!("{mark} {message}");
        }
        self.shown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Toast { level, message });
    }

    pub fn shown(&self) -> Vec<Toast> {
        self.shown.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn had_error(&self) -> bool {
        self.shown().iter().any(|t| t.level == Level::Error)
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter(|t| t.level == level)
            .map(|t| t.message)
            .collect()
    }
}
