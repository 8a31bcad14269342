use async_trait::async_trait;
use sqlx::PgConnection;

use super::meaning::insert_meaning_tree;
use super::{missing_target, require_target, Applied, ChangeHandler};
use crate::common::{RootId, WordAttributeId, WordId};
use crate::domains::change_requests::dependencies::{
    lock_dependencies, resolve_attribute_refs, AttributeSlot,
};
use crate::domains::change_requests::error::Result;
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::change_requests::payloads::{
    decode_payload, required_text, AttributeRef, WordCreate, WordUpdate,
};
use crate::domains::dictionary::{
    NewWord, Pronunciation, RelationKind, Vocabulary, Word, WordChanges, WordRelation,
};

/// Composite create: the word, its root, attribute links, meanings with their
/// examples and attributes, relations and pronunciations.
pub struct WordCreateHandler;

#[async_trait]
impl ChangeHandler for WordCreateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let payload: WordCreate = decode_payload(request)?;

        // Word and meaning lists may share dependencies; take them all up front.
        let meaning_refs = payload.meanings.iter().flat_map(|draft| draft.attributes.iter());
        lock_dependencies(payload.attributes.iter().chain(meaning_refs), conn).await?;

        let root_id = match payload.root.as_deref() {
            Some(label) => Some(find_or_insert_root(label, conn).await?),
            None => None,
        };

        let word = Word::insert(
            NewWord {
                name: required_text("name", &payload.name)?,
                root_id,
                origin: payload.origin,
                prefix: payload.prefix,
                suffix: payload.suffix,
            },
            conn,
        )
        .await?;

        link_word_attributes(word.id, &payload.attributes, conn).await?;

        for (position, draft) in payload.meanings.iter().enumerate() {
            insert_meaning_tree(
                word.id,
                &draft.meaning,
                draft.part_of_speech_id,
                position as i32,
                &draft.attributes,
                &draft.examples,
                conn,
            )
            .await?;
        }

        for related_id in payload.related_words {
            WordRelation::insert(RelationKind::Word, word.id, related_id, &mut *conn).await?;
        }
        for related_id in payload.related_phrases {
            WordRelation::insert(RelationKind::Phrase, word.id, related_id, &mut *conn).await?;
        }

        for pronunciation in &payload.pronunciations {
            let pronunciation = required_text("pronunciation", pronunciation)?;
            Pronunciation::insert(word.id, &pronunciation, &mut *conn).await?;
        }

        Ok(Applied::new(word.id))
    }
}

pub struct WordUpdateHandler;

#[async_trait]
impl ChangeHandler for WordUpdateHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let target = require_target(request)?;
        let word_id = WordId::from_uuid(target);
        let payload: WordUpdate = decode_payload(request)?;

        let name = payload
            .name
            .as_deref()
            .map(|name| required_text("name", name))
            .transpose()?;

        let root_id = match payload.root {
            Some(Some(label)) => Some(Some(find_or_insert_root(&label, conn).await?)),
            Some(None) => Some(None),
            None => None,
        };

        let changes = WordChanges {
            name,
            root_id,
            origin: payload.origin,
            prefix: payload.prefix,
            suffix: payload.suffix,
        };

        let word = Word::apply_changes(word_id, changes, conn)
            .await?
            .ok_or_else(|| missing_target(request, target))?;

        if let Some(attributes) = payload.attributes {
            Word::clear_attributes(word.id, conn).await?;
            link_word_attributes(word.id, &attributes, conn).await?;
        }

        Ok(Applied::new(word.id))
    }
}

async fn find_or_insert_root(label: &str, conn: &mut PgConnection) -> Result<RootId> {
    let label = required_text("root", label)?;
    let id = Vocabulary::Root.find_or_insert(&label, conn).await?;
    Ok(RootId::from_uuid(id))
}

async fn link_word_attributes(
    word_id: WordId,
    refs: &[AttributeRef],
    conn: &mut PgConnection,
) -> Result<()> {
    if refs.is_empty() {
        return Ok(());
    }
    let ids: Vec<WordAttributeId> = resolve_attribute_refs(AttributeSlot::Word, refs, conn)
        .await?
        .into_iter()
        .map(WordAttributeId::from_uuid)
        .collect();
    Word::link_attributes(word_id, &ids, conn).await?;
    Ok(())
}
