use async_trait::async_trait;
use sqlx::PgConnection;

use super::{missing_target, require_target, Applied, ChangeHandler};
use crate::common::{MeaningAttributeId, MeaningId, PartOfSpeechId, WordId};
use crate::domains::change_requests::dependencies::{resolve_attribute_refs, AttributeSlot};
use crate::domains::change_requests::error::Result;
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::change_requests::payloads::{
    decode_payload, required_text, AttributeRef, ExampleDraft, MeaningCreate, MeaningUpdate,
};
use crate::domains::dictionary::{Example, Meaning, MeaningChanges};

pub struct MeaningCreateHandler;

#[async_trait]
impl ChangeHandler for MeaningCreateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let payload: MeaningCreate = decode_payload(request)?;

        let sort_order = match payload.sort_order {
            Some(sort_order) => sort_order,
            None => Meaning::next_sort_order(payload.word_id, &mut *conn).await?,
        };

        let meaning = insert_meaning_tree(
            payload.word_id,
            &payload.meaning,
            payload.part_of_speech_id,
            sort_order,
            &payload.attributes,
            &payload.examples,
            conn,
        )
        .await?;

        Ok(Applied::new(meaning.id))
    }
}

pub struct MeaningUpdateHandler;

#[async_trait]
impl ChangeHandler for MeaningUpdateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let target = require_target(request)?;
        let payload: MeaningUpdate = decode_payload(request)?;

        let changes = MeaningChanges {
            meaning: payload
                .meaning
                .as_deref()
                .map(|text| required_text("meaning", text))
                .transpose()?,
            part_of_speech_id: payload.part_of_speech_id,
            sort_order: payload.sort_order,
        };

        let meaning = Meaning::apply_changes(MeaningId::from_uuid(target), changes, conn)
            .await?
            .ok_or_else(|| missing_target(request, target))?;

        if let Some(attributes) = payload.attributes {
            Meaning::clear_attributes(meaning.id, conn).await?;
            link_meaning_attributes(meaning.id, &attributes, conn).await?;
        }

        Ok(Applied::new(meaning.id))
    }
}

/// Inserts a meaning with its attribute links and examples.
pub(super) async fn insert_meaning_tree(
    word_id: WordId,
    text: &str,
    part_of_speech_id: Option<PartOfSpeechId>,
    sort_order: i32,
    attributes: &[AttributeRef],
    examples: &[ExampleDraft],
    conn: &mut PgConnection,
) -> Result<Meaning> {
    let text = required_text("meaning", text)?;
    let meaning = Meaning::insert(word_id, &text, part_of_speech_id, sort_order, conn).await?;

    link_meaning_attributes(meaning.id, attributes, conn).await?;

    for example in examples {
        let sentence = required_text("sentence", &example.sentence)?;
        Example::insert(meaning.id, &sentence, example.author_id, conn).await?;
    }

    Ok(meaning)
}

async fn link_meaning_attributes(
    meaning_id: MeaningId,
    refs: &[AttributeRef],
    conn: &mut PgConnection,
) -> Result<()> {
    if refs.is_empty() {
        return Ok(());
    }
    let ids: Vec<MeaningAttributeId> = resolve_attribute_refs(AttributeSlot::Meaning, refs, conn)
        .await?
        .into_iter()
        .map(MeaningAttributeId::from_uuid)
        .collect();
    Meaning::link_attributes(meaning_id, &ids, conn).await?;
    Ok(())
}
