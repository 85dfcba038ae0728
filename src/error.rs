//! Error taxonomy for inbox operations.
//!
//! `Validation` errors are raised locally and never reach the server. The remaining
//! variants describe remote failures. None of them is fatal to the session: each one is
//! local to the operation that produced it.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Mailbox not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Server(String),
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message suitable for display; falls back to `fallback` when the server gave
    /// nothing useful.
    pub fn display_or(&self, fallback: &str) -> String {
        match self {
            Self::Server(msg) if msg.trim().is_empty() => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Replace a blank server message with `fallback`.
    pub fn or_fallback(self, fallback: &str) -> Self {
        match self {
            Self::Server(msg) if msg.trim().is_empty() => Self::Server(fallback.to_string()),
            other => other,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Network(e.to_string())
    }
}
