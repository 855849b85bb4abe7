//! Custom error types for the check-in runner
//!
//! Provides a unified error handling system across all modules.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for check-in operations
#[derive(Error, Debug)]
pub enum CheckinError {
    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// A bounded wait ran out of time
    #[error("Timed out after {timeout_ms}ms waiting for {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Push notification errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// Saved login session is missing
    #[error("Session state file '{}' not found. Log in once and save the browser state to this file first.", .0.display())]
    SessionStateMissing(PathBuf),
}

/// Convenience Result type for check-in operations
pub type Result<T> = std::result::Result<T, CheckinError>;

impl CheckinError {
    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from a bounded wait expiring
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
