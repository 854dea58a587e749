//! Error types for DataDrill.
//!
//! A query that no rule understands is not an error; the interpreter returns
//! `None` for it. These variants cover startup and store failures only.

use thiserror::Error;

/// The main error type for DataDrill operations.
#[derive(Debug, Error)]
pub enum DrillError {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not reach the database.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected or failed a statement.
    #[error("Execution error: {0}")]
    Execution(String),

    /// HTTP server failed to bind or serve.
    #[error("Server error: {0}")]
    Server(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DrillError {
    /// HTTP status code for this error when it reaches a client.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Connection(_) => 503,
            _ => 500,
        }
    }
}

impl From<sqlx::Error> for DrillError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(err.to_string())
            }
            other => Self::Execution(other.to_string()),
        }
    }
}

/// Result type alias for DataDrill operations.
pub type DrillResult<T> = Result<T, DrillError>;
