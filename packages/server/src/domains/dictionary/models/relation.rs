//! Cross-references between words: related words and related phrases.
//! Both tables share one shape, `(word_id, related_id)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::common::{WordId, WordRelationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Word,
    Phrase,
}

impl RelationKind {
    pub fn table(self) -> &'static str {
        match self {
            RelationKind::Word => "related_words",
            RelationKind::Phrase => "related_phrases",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WordRelation {
    pub id: WordRelationId,
    pub word_id: WordId,
    pub related_id: WordId,
    pub created_at: DateTime<Utc>,
}

impl WordRelation {
    pub async fn insert<'e, E: PgExecutor<'e>>(
        kind: RelationKind,
        word_id: WordId,
        related_id: WordId,
        db: E,
    ) -> sqlx::Result<Self> {
        let sql = format!(
            "INSERT INTO {} (id, word_id, related_id) VALUES ($1, $2, $3) RETURNING *",
            kind.table()
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(WordRelationId::new())
            .bind(word_id)
            .bind(related_id)
            .fetch_one(db)
            .await
    }

    pub async fn find_for_word<'e, E: PgExecutor<'e>>(
        kind: RelationKind,
        word_id: WordId,
        db: E,
    ) -> sqlx::Result<Vec<Self>> {
        let sql = format!("SELECT * FROM {} WHERE word_id = $1 ORDER BY id", kind.table());
        sqlx::query_as::<_, Self>(&sql)
            .bind(word_id)
            .fetch_all(db)
            .await
    }
}
