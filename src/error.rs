//! Error types for sqlkeeper
//!
//! Every failure a UI action or CLI command can hit maps onto one of these
//! variants. `Cancelled` is the odd one out: it marks a dismissed prompt and
//! is never shown to the user as an error.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sqlkeeper
pub type Result<T> = std::result::Result<T, KeeperError>;

#[derive(Error, Debug)]
pub enum KeeperError {
    /// Bad credentials, host, port or a network failure
    #[error("Could not connect to the MySQL server:\n{0}")]
    Connection(String),

    /// Schema listing failed on a live connection
    #[error("Could not list databases:\n{0}")]
    Query(String),

    /// Neither the bundled, executable-adjacent nor PATH copy of a tool exists
    #[error("{tool} was not found.\n\nEither place a mysql/bin directory next to the program\nor add the MySQL client tools to PATH.")]
    ToolNotFound { tool: String },

    /// External tool exited non-zero
    #[error("{tool} exited with {}:\n{stderr}", .code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c)))]
    Process {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A dump or restore file could not be created or opened
    #[error("Cannot {action} {}: {source}", .path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background job died without reporting a result
    #[error("Background job stopped unexpectedly: {0}")]
    Worker(String),

    /// The user dismissed a prompt
    #[error("Operation cancelled")]
    Cancelled,
}

impl KeeperError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, KeeperError::Cancelled)
    }
}

impl From<sqlx::Error> for KeeperError {
    fn from(e: sqlx::Error) -> Self {
        KeeperError::Query(e.to_string())
    }
}
