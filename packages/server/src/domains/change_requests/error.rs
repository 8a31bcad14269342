use sqlx::error::ErrorKind;
use thiserror::Error;

use super::models::{Action, EntityKind};

/// Errors raised while submitting, resolving or applying change requests.
///
/// Any of these aborts the enclosing transaction; the request stays pending.
#[derive(Error, Debug)]
pub enum ChangeRequestError {
    /// Malformed request or payload, or a dependency of the wrong kind.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing request, target entity, or dependency.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No handler is registered for the pair. A deploy-time gap.
    #[error("No handler registered for {action} on {entity_kind}")]
    Configuration {
        entity_kind: EntityKind,
        action: Action,
    },

    /// The request was already resolved, or lost a race with another resolution.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ChangeRequestError {
    fn from(error: sqlx::Error) -> Self {
        let classified = error.as_database_error().and_then(|db| match db.kind() {
            ErrorKind::UniqueViolation => Some(Self::Validation(format!(
                "duplicate value: {}",
                db.message()
            ))),
            ErrorKind::ForeignKeyViolation => Some(Self::NotFound(format!(
                "referenced entity does not exist: {}",
                db.message()
            ))),
            _ => None,
        });

        classified.unwrap_or(Self::Database(error))
    }
}

pub type Result<T, E = ChangeRequestError> = std::result::Result<T, E>;
