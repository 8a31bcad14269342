pub mod example;
pub mod meaning;
pub mod pronunciation;
pub mod relation;
pub mod vocabulary;
pub mod word;

pub use example::{Example, ExampleChanges};
pub use meaning::{Meaning, MeaningChanges};
pub use pronunciation::Pronunciation;
pub use relation::{RelationKind, WordRelation};
pub use vocabulary::Vocabulary;
pub use word::{NewWord, Word, WordChanges};

use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{Encode, FromRow, PgConnection, Postgres, QueryBuilder, Type};
use uuid::Uuid;

/// `UPDATE <table> SET ...` over only the columns that were assigned.
///
/// Unassigned columns never appear in the statement, so concurrent updates
/// of different columns on the same row do not overwrite each other.
pub(crate) struct SparseUpdate<'args> {
    builder: QueryBuilder<'args, Postgres>,
    assigned: usize,
}

impl<'args> SparseUpdate<'args> {
    pub(crate) fn new(table: &'static str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            assigned: 0,
        }
    }

    pub(crate) fn set<T>(&mut self, column: &'static str, value: T) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if self.assigned > 0 {
            self.builder.push(", ");
        }
        self.builder.push(column).push(" = ").push_bind(value);
        self.assigned += 1;
        self
    }

    /// Sets the column when the field was present in the change set.
    pub(crate) fn set_some<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    /// Runs the update against one row. `None` if the row does not exist.
    pub(crate) async fn execute<T>(mut self, id: Uuid, conn: &mut PgConnection) -> sqlx::Result<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        self.builder.build_query_as::<T>().fetch_optional(conn).await
    }
}

/// Deletes one row by primary key. Returns whether a row was removed.
pub async fn delete_by_id<'e, E: PgExecutor<'e>>(
    table: &'static str,
    id: Uuid,
    db: E,
) -> sqlx::Result<bool> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
