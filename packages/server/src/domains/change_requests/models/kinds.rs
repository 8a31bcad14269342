//! Closed vocabularies of the request model: entity kind, action, status.
//!
//! Stored as TEXT; the migration's CHECK constraints list the same strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domains::change_requests::error::ChangeRequestError;

/// Implements Display, FromStr and sqlx TEXT encoding from `as_str`/`ALL`.
macro_rules! impl_text_enum {
    ($name:ident, $label:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ChangeRequestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == s)
                    .ok_or_else(|| {
                        ChangeRequestError::Validation(format!("unknown {}: {}", $label, s))
                    })
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl sqlx::Decode<'_, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'_>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(text.parse()?)
            }
        }
    };
}

/// Category of dictionary content a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Word,
    Meaning,
    Root,
    RelatedWord,
    RelatedPhrase,
    PartOfSpeech,
    Example,
    Author,
    WordAttribute,
    MeaningAttribute,
    Pronunciation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Word,
        EntityKind::Meaning,
        EntityKind::Root,
        EntityKind::RelatedWord,
        EntityKind::RelatedPhrase,
        EntityKind::PartOfSpeech,
        EntityKind::Example,
        EntityKind::Author,
        EntityKind::WordAttribute,
        EntityKind::MeaningAttribute,
        EntityKind::Pronunciation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Word => "word",
            EntityKind::Meaning => "meaning",
            EntityKind::Root => "root",
            EntityKind::RelatedWord => "related-word",
            EntityKind::RelatedPhrase => "related-phrase",
            EntityKind::PartOfSpeech => "part-of-speech",
            EntityKind::Example => "example",
            EntityKind::Author => "author",
            EntityKind::WordAttribute => "word-attribute",
            EntityKind::MeaningAttribute => "meaning-attribute",
            EntityKind::Pronunciation => "pronunciation",
        }
    }
}

impl_text_enum!(EntityKind, "entity kind");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Create, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl_text_enum!(Action, "action");

/// Request lifecycle. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != RequestStatus::Pending
    }
}

impl_text_enum!(RequestStatus, "request status");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_storage_names() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn unknown_names_are_validation_errors() {
        assert!(matches!(
            "authors".parse::<EntityKind>(),
            Err(ChangeRequestError::Validation(_))
        ));
        assert!(matches!(
            "merge".parse::<Action>(),
            Err(ChangeRequestError::Validation(_))
        ));
    }

    #[test]
    fn only_pending_is_open() {
        let open: Vec<_> = RequestStatus::ALL
            .into_iter()
            .filter(|status| !status.is_terminal())
            .collect();
        assert_eq!(open, vec![RequestStatus::Pending]);
    }
}
