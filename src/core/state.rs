//! # Application State
//!
//! Core business state for QueryDesk. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── log: DiscussionLog              // query/response transcript
//! ├── staging: FileStagingList        // files picked in the upload panel
//! ├── upload_panel_open: bool         // panel visibility
//! ├── status_message: String          // status bar text
//! ├── backend: BackendStatus          // result of the startup health probe
//! └── accepted_extensions: Vec<String>
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use crate::core::config::ResolvedConfig;
use crate::core::discussion::DiscussionLog;
use crate::core::staging::FileStagingList;

/// Reachability of the query backend, as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BackendStatus::Unknown => "backend: ...",
            BackendStatus::Online => "backend: online",
            BackendStatus::Offline => "backend: offline",
        }
    }
}

pub struct App {
    pub log: DiscussionLog,
    pub staging: FileStagingList,
    pub upload_panel_open: bool,
    pub status_message: String,
    pub backend: BackendStatus,
    pub base_url: String,
    /// Lowercase, no leading dot.
    pub accepted_extensions: Vec<String>,
}

impl App {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            log: DiscussionLog::new(),
            staging: FileStagingList::new(),
            upload_panel_open: false,
            status_message: String::from("Welcome to QueryDesk!"),
            backend: BackendStatus::Unknown,
            base_url: config.base_url.clone(),
            accepted_extensions: config.accepted_extensions.clone(),
        }
    }

    /// True while an exchange is waiting for its response.
    pub fn is_loading(&self) -> bool {
        self.log.pending().is_some()
    }
}
