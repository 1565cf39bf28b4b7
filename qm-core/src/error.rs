//! Global error types for the Quizmates client core.
//!
//! All error categories across the workspace are unified into a single
//! `QmError` enum with conversions from underlying library errors.
//! Nothing here is fatal: every failure is recoverable by re-invoking
//! the operation that produced it.

use thiserror::Error;

/// Convenience type alias for Results using QmError.
pub type QmResult<T> = Result<T, QmError>;

/// Unified error type covering all error categories in Quizmates.
#[derive(Error, Debug)]
pub enum QmError {
    // -- Input errors --
    /// A relationship record was malformed (e.g. missing identifier).
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    // -- Feed errors --
    /// The discovery source could not produce a page. Retryable.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Service errors --
    /// A service operation failed.
    #[error("service error: {0}")]
    Service(String),

    // -- Generic --
    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QmError {
    /// Whether re-invoking the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QmError::FetchFailed(_))
    }
}

impl From<serde_json::Error> for QmError {
    fn from(e: serde_json::Error) -> Self {
        QmError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for QmError {
    fn from(e: toml::de::Error) -> Self {
        QmError::Config(e.to_string())
    }
}
