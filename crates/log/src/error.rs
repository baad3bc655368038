//! Logger errors

use thiserror::Error;

/// Result type for logger setup.
pub type LogResult<T> = Result<T, LogError>;

#[derive(Debug, Error)]
pub enum LogError {
    /// The level / filter directive could not be parsed.
    #[error("invalid log filter {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}
