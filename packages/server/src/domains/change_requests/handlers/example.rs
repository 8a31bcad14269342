use async_trait::async_trait;
use sqlx::PgConnection;

use super::{missing_target, require_target, Applied, ChangeHandler};
use crate::common::ExampleId;
use crate::domains::change_requests::error::Result;
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::change_requests::payloads::{
    decode_payload, required_text, ExampleCreate, ExampleUpdate,
};
use crate::domains::dictionary::{Example, ExampleChanges};

pub struct ExampleCreateHandler;

#[async_trait]
impl ChangeHandler for ExampleCreateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let payload: ExampleCreate = decode_payload(request)?;
        let sentence = required_text("sentence", &payload.sentence)?;
        let example = Example::insert(payload.meaning_id, &sentence, payload.author_id, conn).await?;
        Ok(Applied::new(example.id))
    }
}

pub struct ExampleUpdateHandler;

#[async_trait]
impl ChangeHandler for ExampleUpdateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let target = require_target(request)?;
        let payload: ExampleUpdate = decode_payload(request)?;

        let changes = ExampleChanges {
            sentence: payload
                .sentence
                .as_deref()
                .map(|sentence| required_text("sentence", sentence))
                .transpose()?,
            author_id: payload.author_id,
        };

        let example = Example::apply_changes(ExampleId::from_uuid(target), changes, conn)
            .await?
            .ok_or_else(|| missing_target(request, target))?;
        Ok(Applied::new(example.id))
    }
}
