//! Typed request payloads.
//!
//! Create payloads carry the full entity. Update payloads are sparse: every
//! field is optional and only present fields are applied. Nullable columns use
//! `Option<Option<T>>`, where an absent key leaves the column alone and an
//! explicit `null` clears it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::{ChangeRequestError, Result};
use super::models::ChangeRequest;
use crate::common::{AuthorId, ChangeRequestId, MeaningId, PartOfSpeechId, WordId};

/// An attribute id, or the attribute another pending request will create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeRef {
    Resolved(Uuid),
    PendingOn(ChangeRequestId),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordCreate {
    pub name: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
    #[serde(default)]
    pub meanings: Vec<MeaningDraft>,
    #[serde(default)]
    pub related_words: Vec<WordId>,
    #[serde(default)]
    pub related_phrases: Vec<WordId>,
    #[serde(default)]
    pub pronunciations: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordUpdate {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub root: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub origin: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub prefix: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub suffix: Option<Option<String>>,
    /// Replaces the word's attribute links.
    pub attributes: Option<Vec<AttributeRef>>,
}

/// A meaning nested in a word create.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeaningDraft {
    pub meaning: String,
    #[serde(default)]
    pub part_of_speech_id: Option<PartOfSpeechId>,
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
    #[serde(default)]
    pub examples: Vec<ExampleDraft>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeaningCreate {
    pub word_id: WordId,
    pub meaning: String,
    #[serde(default)]
    pub part_of_speech_id: Option<PartOfSpeechId>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
    #[serde(default)]
    pub examples: Vec<ExampleDraft>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeaningUpdate {
    pub meaning: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub part_of_speech_id: Option<Option<PartOfSpeechId>>,
    pub sort_order: Option<i32>,
    /// Replaces the meaning's attribute links.
    pub attributes: Option<Vec<AttributeRef>>,
}

/// An example nested in a meaning.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleDraft {
    pub sentence: String,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleCreate {
    pub meaning_id: MeaningId,
    pub sentence: String,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleUpdate {
    pub sentence: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub author_id: Option<Option<AuthorId>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedWordCreate {
    pub word_id: WordId,
    pub related_word_id: WordId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedPhraseCreate {
    pub word_id: WordId,
    pub related_phrase_id: WordId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PronunciationCreate {
    pub word_id: WordId,
    pub pronunciation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PronunciationUpdate {
    pub pronunciation: Option<String>,
}

/// Decodes a request payload into its typed form.
pub fn decode_payload<T: DeserializeOwned>(request: &ChangeRequest) -> Result<T> {
    T::deserialize(&request.payload).map_err(|e| {
        ChangeRequestError::Validation(format!(
            "invalid {} {} payload for request {}: {}",
            request.entity_kind, request.action, request.id, e
        ))
    })
}

/// Reads the single label field of a vocabulary payload (`{"attribute": "slang"}`).
///
/// `Ok(None)` when the field is absent. Any other key is rejected.
pub fn vocabulary_label(payload: &Value, field: &str) -> Result<Option<String>> {
    let object = payload.as_object().ok_or_else(|| {
        ChangeRequestError::Validation("payload must be a JSON object".to_string())
    })?;

    if let Some(unknown) = object.keys().find(|key| key.as_str() != field) {
        return Err(ChangeRequestError::Validation(format!(
            "unknown field `{}`, expected `{}`",
            unknown, field
        )));
    }

    match object.get(field) {
        None => Ok(None),
        Some(Value::String(label)) => Ok(Some(required_text(field, label)?)),
        Some(other) => Err(ChangeRequestError::Validation(format!(
            "`{}` must be a string, got {}",
            field, other
        ))),
    }
}

/// Trims a text field and rejects it when blank.
pub fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChangeRequestError::Validation(format!(
            "`{}` must not be blank",
            field
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_refs_are_tagged() {
        let pending = ChangeRequestId::new();
        let resolved = Uuid::now_v7();
        let refs: Vec<AttributeRef> = serde_json::from_value(json!([
            { "resolved": resolved },
            { "pending_on": pending },
        ]))
        .unwrap();

        assert_eq!(
            refs,
            vec![AttributeRef::Resolved(resolved), AttributeRef::PendingOn(pending)]
        );
    }

    #[test]
    fn bare_ids_are_not_references() {
        let result: std::result::Result<Vec<AttributeRef>, _> =
            serde_json::from_value(json!([-7]));
        assert!(result.is_err());
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: WordUpdate = serde_json::from_value(json!({ "origin": null })).unwrap();
        assert_eq!(update.origin, Some(None));
        assert_eq!(update.prefix, None);
        assert!(update.name.is_none());
        assert!(update.attributes.is_none());
    }

    #[test]
    fn unknown_update_fields_are_rejected() {
        let result: std::result::Result<MeaningUpdate, _> =
            serde_json::from_value(json!({ "definition": "typo" }));
        assert!(result.is_err());
    }

    #[test]
    fn word_create_defaults_nested_lists() {
        let create: WordCreate = serde_json::from_value(json!({
            "name": "kalem",
            "meanings": [{ "meaning": "a writing instrument" }],
        }))
        .unwrap();

        assert_eq!(create.meanings.len(), 1);
        assert!(create.meanings[0].examples.is_empty());
        assert!(create.attributes.is_empty());
    }

    #[test]
    fn vocabulary_label_reads_one_field() {
        assert_eq!(
            vocabulary_label(&json!({ "attribute": " slang " }), "attribute").unwrap(),
            Some("slang".to_string())
        );
        assert_eq!(vocabulary_label(&json!({}), "attribute").unwrap(), None);
        assert!(vocabulary_label(&json!({ "name": "x" }), "attribute").is_err());
        assert!(vocabulary_label(&json!({ "attribute": "  " }), "attribute").is_err());
        assert!(vocabulary_label(&json!({ "attribute": 3 }), "attribute").is_err());
    }
}
