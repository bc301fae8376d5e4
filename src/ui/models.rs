use std::fmt;
use std::path::PathBuf;

use crate::jobs::{JobKind, JobRequest};

pub mod connection_config;

pub use connection_config::ConnectionConfig;

/// Input mode for the UI
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Entries of the database context menu
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ContextAction {
    Backup,
    Restore,
}

impl ContextAction {
    pub fn all() -> [ContextAction; 2] {
        [ContextAction::Backup, ContextAction::Restore]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContextAction::Backup => "Backup",
            ContextAction::Restore => "Restore",
        }
    }

    pub fn job_kind(&self) -> JobKind {
        match self {
            ContextAction::Backup => JobKind::Backup,
            ContextAction::Restore => JobKind::Restore,
        }
    }

    pub fn toggled(&self) -> ContextAction {
        match self {
            ContextAction::Backup => ContextAction::Restore,
            ContextAction::Restore => ContextAction::Backup,
        }
    }
}

/// State of the popup
#[derive(Debug, PartialEq)]
pub enum PopupState {
    Hidden,
    /// Backup/Restore menu for one database
    ContextMenu { database: String, selected: ContextAction },
    /// File path prompt; a save prompt for backups, an open prompt for restores
    PathPrompt { kind: JobKind, database: String, input: String },
    /// Overwrite warning shown before a restore
    ConfirmRestore { database: String, path: PathBuf },
    /// A backup or restore is running in the background
    Running(JobRequest),
    Info { title: String, message: String },
    Warning(String),
    Error { title: String, message: String },
    Success(String),
}

impl PopupState {
    /// Popups that only wait to be dismissed
    pub fn is_message(&self) -> bool {
        matches!(
            self,
            PopupState::Info { .. } | PopupState::Warning(_) | PopupState::Error { .. } | PopupState::Success(_)
        )
    }
}

/// Focus field for the UI
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FocusField {
    // Connection panel
    Host,
    Port,
    User,
    Password,
    DatabaseList,
}

impl fmt::Display for FocusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusField::Host => write!(f, "Host"),
            FocusField::Port => write!(f, "Port"),
            FocusField::User => write!(f, "User"),
            FocusField::Password => write!(f, "Password"),
            FocusField::DatabaseList => write!(f, "Databases"),
        }
    }
}
