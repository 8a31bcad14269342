use async_trait::async_trait;
use sqlx::PgConnection;

use super::{Applied, ChangeHandler};
use crate::common::WordId;
use crate::domains::change_requests::error::{ChangeRequestError, Result};
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::change_requests::payloads::{
    decode_payload, RelatedPhraseCreate, RelatedWordCreate,
};
use crate::domains::dictionary::{RelationKind, WordRelation};

/// Links two words as related words or as a related phrase.
pub struct RelationCreateHandler(pub RelationKind);

#[async_trait]
impl ChangeHandler for RelationCreateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let (word_id, related_id): (WordId, WordId) = match self.0 {
            RelationKind::Word => {
                let payload: RelatedWordCreate = decode_payload(request)?;
                (payload.word_id, payload.related_word_id)
            }
            RelationKind::Phrase => {
                let payload: RelatedPhraseCreate = decode_payload(request)?;
                (payload.word_id, payload.related_phrase_id)
            }
        };

        if word_id == related_id {
            return Err(ChangeRequestError::Validation(format!(
                "word {} cannot be related to itself",
                word_id
            )));
        }

        let relation = WordRelation::insert(self.0, word_id, related_id, conn).await?;
        Ok(Applied::new(relation.id))
    }
}
