//! `careadmin-console`: the administration console.
//!
//! Pages are plain async functions over a shared [`App`]; the `careadmin`
//! binary maps CLI commands onto them.

pub mod app;
pub mod appbar;
pub mod cli;
pub mod commands;
pub mod forms;
pub mod pages;
pub mod render;
pub mod toast;

pub use app::{App, Prompt, TerminalPrompt};
pub use toast::{Level, Toast, Toaster};
