use async_trait::async_trait;
use sqlx::PgConnection;

use super::{missing_target, require_target, Applied, ChangeHandler};
use crate::common::PronunciationId;
use crate::domains::change_requests::error::Result;
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::change_requests::payloads::{
    decode_payload, required_text, PronunciationCreate, PronunciationUpdate,
};
use crate::domains::dictionary::Pronunciation;

pub struct PronunciationCreateHandler;

#[async_trait]
impl ChangeHandler for PronunciationCreateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let payload: PronunciationCreate = decode_payload(request)?;
        let text = required_text("pronunciation", &payload.pronunciation)?;
        let pronunciation = Pronunciation::insert(payload.word_id, &text, conn).await?;
        Ok(Applied::new(pronunciation.id))
    }
}

pub struct PronunciationUpdateHandler;

#[async_trait]
impl ChangeHandler for PronunciationUpdateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let target = require_target(request)?;
        let id = PronunciationId::from_uuid(target);
        let payload: PronunciationUpdate = decode_payload(request)?;

        // Nothing else on a pronunciation is editable, so an empty change set
        // only confirms the row exists.
        let pronunciation = match payload.pronunciation {
            Some(text) => {
                let text = required_text("pronunciation", &text)?;
                Pronunciation::set_pronunciation(id, &text, conn).await?
            }
            None => Pronunciation::find_by_id(id, conn).await?,
        }
        .ok_or_else(|| missing_target(request, target))?;

        Ok(Applied::new(pronunciation.id))
    }
}
