//! Error taxonomy shared by the stores, the core operations and the API

use thiserror::Error;

/// Result type for library operations
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;

#[derive(Error, Debug)]
pub enum LibraryError {
    /// Malformed or missing input; nothing was mutated
    #[error("{0}")]
    InvalidArgument(String),

    /// Uniqueness violation, safe to retry with different input
    #[error("{0}")]
    Conflict(String),

    /// Entity absent or owned by someone else
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Store or connectivity failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        LibraryError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        LibraryError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        LibraryError::Conflict(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        LibraryError::Unauthenticated(msg.into())
    }
}

impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LibraryError::Conflict(db_err.message().to_string())
            }
            _ => LibraryError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for LibraryError {
    fn from(err: anyhow::Error) -> Self {
        LibraryError::Internal(format!("{:#}", err))
    }
}
