use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::PgConnection;

use super::SparseUpdate;
use crate::common::{AuthorId, ExampleId, MeaningId};

/// A usage example attached to a meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Example {
    pub id: ExampleId,
    pub meaning_id: MeaningId,
    pub sentence: String,
    pub author_id: Option<AuthorId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ExampleChanges {
    pub sentence: Option<String>,
    pub author_id: Option<Option<AuthorId>>,
}

impl Example {
    pub const TABLE: &'static str = "examples";

    pub async fn insert(
        meaning_id: MeaningId,
        sentence: &str,
        author_id: Option<AuthorId>,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO examples (id, meaning_id, sentence, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ExampleId::new())
        .bind(meaning_id)
        .bind(sentence)
        .bind(author_id)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(id: ExampleId, db: E) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM examples WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_meaning<'e, E: PgExecutor<'e>>(
        meaning_id: MeaningId,
        db: E,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM examples WHERE meaning_id = $1 ORDER BY id")
            .bind(meaning_id)
            .fetch_all(db)
            .await
    }

    pub async fn apply_changes(
        id: ExampleId,
        changes: ExampleChanges,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        let mut update = SparseUpdate::new(Self::TABLE);
        update
            .set_some("sentence", changes.sentence)
            .set_some("author_id", changes.author_id);

        if update.is_empty() {
            return Self::find_by_id(id, conn).await;
        }
        update.execute(id.into_uuid(), conn).await
    }
}
