use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::PgConnection;

use super::SparseUpdate;
use crate::common::{MeaningAttributeId, MeaningId, PartOfSpeechId, WordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meaning {
    pub id: MeaningId,
    pub word_id: WordId,
    pub meaning: String,
    pub part_of_speech_id: Option<PartOfSpeechId>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct MeaningChanges {
    pub meaning: Option<String>,
    pub part_of_speech_id: Option<Option<PartOfSpeechId>>,
    pub sort_order: Option<i32>,
}

impl Meaning {
    pub const TABLE: &'static str = "meanings";

    pub async fn insert(
        word_id: WordId,
        meaning: &str,
        part_of_speech_id: Option<PartOfSpeechId>,
        sort_order: i32,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO meanings (id, word_id, meaning, part_of_speech_id, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(MeaningId::new())
        .bind(word_id)
        .bind(meaning)
        .bind(part_of_speech_id)
        .bind(sort_order)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(id: MeaningId, db: E) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM meanings WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_word<'e, E: PgExecutor<'e>>(word_id: WordId, db: E) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM meanings WHERE word_id = $1 ORDER BY sort_order, id",
        )
        .bind(word_id)
        .fetch_all(db)
        .await
    }

    /// Sort position after the word's current last meaning.
    pub async fn next_sort_order<'e, E: PgExecutor<'e>>(word_id: WordId, db: E) -> sqlx::Result<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM meanings WHERE word_id = $1",
        )
        .bind(word_id)
        .fetch_one(db)
        .await
    }

    pub async fn apply_changes(
        id: MeaningId,
        changes: MeaningChanges,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        let mut update = SparseUpdate::new(Self::TABLE);
        update
            .set_some("meaning", changes.meaning)
            .set_some("part_of_speech_id", changes.part_of_speech_id)
            .set_some("sort_order", changes.sort_order);

        if update.is_empty() {
            return Self::find_by_id(id, conn).await;
        }
        update.execute(id.into_uuid(), conn).await
    }

    pub async fn link_attributes(
        id: MeaningId,
        attribute_ids: &[MeaningAttributeId],
        conn: &mut PgConnection,
    ) -> sqlx::Result<()> {
        for attribute_id in attribute_ids {
            sqlx::query(
                "INSERT INTO meanings_attributes (meaning_id, attribute_id) VALUES ($1, $2)",
            )
            .bind(id)
            .bind(attribute_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn clear_attributes(id: MeaningId, conn: &mut PgConnection) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM meanings_attributes WHERE meaning_id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn attribute_ids<'e, E: PgExecutor<'e>>(
        id: MeaningId,
        db: E,
    ) -> sqlx::Result<Vec<MeaningAttributeId>> {
        sqlx::query_scalar::<_, MeaningAttributeId>(
            "SELECT attribute_id FROM meanings_attributes WHERE meaning_id = $1 ORDER BY attribute_id",
        )
        .bind(id)
        .fetch_all(db)
        .await
    }
}
