use thiserror::Error as ThisError;

/// Message used for every failed ownership check, whether the record is
/// missing or belongs to someone else.
pub const ACCESS_DENIED: &str = "not found or access denied";

#[derive(Debug, ThisError, PartialEq, Eq)]
#[non_exhaustive]
pub enum LiftlogError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, LiftlogError>;

impl LiftlogError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        LiftlogError::Invalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        LiftlogError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        LiftlogError::Conflict(msg.into())
    }

    pub fn access_denied() -> Self {
        LiftlogError::Forbidden(ACCESS_DENIED.to_string())
    }

    pub fn with_display<D: std::fmt::Display>(d: D) -> Self {
        LiftlogError::Internal(d.to_string())
    }

    /// The bare message, without the kind prefix `Display` adds for internal errors.
    pub fn message(&self) -> &str {
        match self {
            LiftlogError::Invalid(m)
            | LiftlogError::NotFound(m)
            | LiftlogError::Forbidden(m)
            | LiftlogError::Conflict(m)
            | LiftlogError::Internal(m) => m,
        }
    }
}

impl From<sqlx::Error> for LiftlogError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => LiftlogError::NotFound("record not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                LiftlogError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                LiftlogError::Invalid(db.message().to_string())
            }
            other => LiftlogError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for LiftlogError {
    fn from(e: anyhow::Error) -> Self {
        LiftlogError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for LiftlogError {
    fn from(e: tokio::task::JoinError) -> Self {
        LiftlogError::with_display(e)
    }
}
