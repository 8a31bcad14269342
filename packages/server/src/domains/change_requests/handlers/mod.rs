//! Change handlers, one per supported (entity kind, action) pair.
//!
//! A handler applies one request's mutation on the connection it is given.
//! It never begins, commits or rolls back; the caller owns the transaction.

mod delete;
mod example;
mod meaning;
mod pronunciation;
pub mod registry;
mod relation;
mod vocabulary;
mod word;

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use super::error::{ChangeRequestError, Result};
use super::models::ChangeRequest;

pub use delete::DeleteHandler;
pub use example::{ExampleCreateHandler, ExampleUpdateHandler};
pub use meaning::{MeaningCreateHandler, MeaningUpdateHandler};
pub use pronunciation::{PronunciationCreateHandler, PronunciationUpdateHandler};
pub use registry::{get_handler, HandlerRegistry};
pub use relation::RelationCreateHandler;
pub use vocabulary::{VocabularyCreateHandler, VocabularyUpdateHandler};
pub use word::{WordCreateHandler, WordUpdateHandler};

/// What an applied request produced or touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub entity_id: Uuid,
}

impl Applied {
    pub fn new(entity_id: impl Into<Uuid>) -> Self {
        Self {
            entity_id: entity_id.into(),
        }
    }
}

#[async_trait]
pub trait ChangeHandler: Send + Sync {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied>;
}

/// The target of an update or delete.
pub(crate) fn require_target(request: &ChangeRequest) -> Result<Uuid> {
    request.target_entity_id.ok_or_else(|| {
        ChangeRequestError::Validation(format!(
            "{} {} request {} requires a target entity",
            request.entity_kind, request.action, request.id
        ))
    })
}

pub(crate) fn missing_target(request: &ChangeRequest, target: Uuid) -> ChangeRequestError {
    ChangeRequestError::NotFound(format!("{} {} does not exist", request.entity_kind, target))
}
