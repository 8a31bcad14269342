use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::PgConnection;

use super::SparseUpdate;
use crate::common::{RootId, WordAttributeId, WordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Word {
    pub id: WordId,
    pub name: String,
    pub root_id: Option<RootId>,
    pub origin: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewWord {
    pub name: String,
    pub root_id: Option<RootId>,
    pub origin: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// Column-level change set. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct WordChanges {
    pub name: Option<String>,
    pub root_id: Option<Option<RootId>>,
    pub origin: Option<Option<String>>,
    pub prefix: Option<Option<String>>,
    pub suffix: Option<Option<String>>,
}

impl Word {
    pub const TABLE: &'static str = "words";

    pub async fn insert(input: NewWord, conn: &mut PgConnection) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO words (id, name, root_id, origin, prefix, suffix)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(WordId::new())
        .bind(input.name)
        .bind(input.root_id)
        .bind(input.origin)
        .bind(input.prefix)
        .bind(input.suffix)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(id: WordId, db: E) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM words WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_name<'e, E: PgExecutor<'e>>(name: &str, db: E) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM words WHERE name = $1 ORDER BY id")
            .bind(name)
            .fetch_all(db)
            .await
    }

    /// Applies only the present changes. `None` if the word does not exist.
    pub async fn apply_changes(
        id: WordId,
        changes: WordChanges,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        let mut update = SparseUpdate::new(Self::TABLE);
        update
            .set_some("name", changes.name)
            .set_some("root_id", changes.root_id)
            .set_some("origin", changes.origin)
            .set_some("prefix", changes.prefix)
            .set_some("suffix", changes.suffix);

        if update.is_empty() {
            return Self::find_by_id(id, conn).await;
        }
        update.execute(id.into_uuid(), conn).await
    }

    pub async fn link_attributes(
        id: WordId,
        attribute_ids: &[WordAttributeId],
        conn: &mut PgConnection,
    ) -> sqlx::Result<()> {
        for attribute_id in attribute_ids {
            sqlx::query("INSERT INTO words_attributes (word_id, attribute_id) VALUES ($1, $2)")
                .bind(id)
                .bind(attribute_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub async fn clear_attributes(id: WordId, conn: &mut PgConnection) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM words_attributes WHERE word_id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn attribute_ids<'e, E: PgExecutor<'e>>(
        id: WordId,
        db: E,
    ) -> sqlx::Result<Vec<WordAttributeId>> {
        sqlx::query_scalar::<_, WordAttributeId>(
            "SELECT attribute_id FROM words_attributes WHERE word_id = $1 ORDER BY attribute_id",
        )
        .bind(id)
        .fetch_all(db)
        .await
    }
}
