//! Domain errors for the hierarchy repair engine.

use thiserror::Error;

/// Domain-level errors that can occur while repairing a hierarchy.
///
/// Malformed dates, invalid links and unresolvable assignments are not
/// errors: they are counted in the pass reports. Only store failures surface
/// here, and every one of them aborts the run.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}
