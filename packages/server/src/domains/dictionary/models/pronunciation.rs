use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::common::{PronunciationId, WordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pronunciation {
    pub id: PronunciationId,
    pub word_id: WordId,
    pub pronunciation: String,
    pub created_at: DateTime<Utc>,
}

impl Pronunciation {
    pub const TABLE: &'static str = "pronunciations";

    pub async fn insert<'e, E: PgExecutor<'e>>(
        word_id: WordId,
        pronunciation: &str,
        db: E,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO pronunciations (id, word_id, pronunciation)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(PronunciationId::new())
        .bind(word_id)
        .bind(pronunciation)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        id: PronunciationId,
        db: E,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM pronunciations WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_word<'e, E: PgExecutor<'e>>(word_id: WordId, db: E) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM pronunciations WHERE word_id = $1 ORDER BY id")
            .bind(word_id)
            .fetch_all(db)
            .await
    }

    /// Replaces the text. `None` if the row does not exist.
    pub async fn set_pronunciation<'e, E: PgExecutor<'e>>(
        id: PronunciationId,
        pronunciation: &str,
        db: E,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE pronunciations SET pronunciation = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(pronunciation)
        .fetch_optional(db)
        .await
    }
}
