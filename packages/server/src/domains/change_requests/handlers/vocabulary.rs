use async_trait::async_trait;
use sqlx::PgConnection;

use super::{missing_target, require_target, Applied, ChangeHandler};
use crate::domains::change_requests::error::{ChangeRequestError, Result};
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::change_requests::payloads::vocabulary_label;
use crate::domains::dictionary::Vocabulary;

/// Adds a vocabulary label. An existing row with the same label is reused,
/// which is also how a dependency materialized earlier gets adopted.
pub struct VocabularyCreateHandler(pub Vocabulary);

#[async_trait]
impl ChangeHandler for VocabularyCreateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let label = required_label(self.0, request)?;
        let id = self.0.find_or_insert(&label, conn).await?;
        Ok(Applied::new(id))
    }
}

pub struct VocabularyUpdateHandler(pub Vocabulary);

#[async_trait]
impl ChangeHandler for VocabularyUpdateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let target = require_target(request)?;
        let label = required_label(self.0, request)?;
        if !self.0.relabel(target, &label, conn).await? {
            return Err(missing_target(request, target));
        }
        Ok(Applied::new(target))
    }
}

fn required_label(vocabulary: Vocabulary, request: &ChangeRequest) -> Result<String> {
    vocabulary_label(&request.payload, vocabulary.column())?.ok_or_else(|| {
        ChangeRequestError::Validation(format!(
            "{} payload for request {} is missing `{}`",
            request.entity_kind,
            request.id,
            vocabulary.column()
        ))
    })
}
