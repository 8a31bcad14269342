//! Controlled vocabularies: roots, parts of speech, word and meaning
//! attributes, and authors. Each is a table with a unique label column.

use sqlx::postgres::PgExecutor;
use sqlx::PgConnection;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    Root,
    PartOfSpeech,
    WordAttribute,
    MeaningAttribute,
    Author,
}

impl Vocabulary {
    pub fn table(self) -> &'static str {
        match self {
            Vocabulary::Root => "roots",
            Vocabulary::PartOfSpeech => "parts_of_speech",
            Vocabulary::WordAttribute => "word_attributes",
            Vocabulary::MeaningAttribute => "meaning_attributes",
            Vocabulary::Author => "authors",
        }
    }

    /// The label column, which is also the payload field name.
    pub fn column(self) -> &'static str {
        match self {
            Vocabulary::Root => "root",
            Vocabulary::PartOfSpeech => "part_of_speech",
            Vocabulary::WordAttribute | Vocabulary::MeaningAttribute => "attribute",
            Vocabulary::Author => "name",
        }
    }

    /// Returns the id of the row carrying `label`, inserting it if absent.
    ///
    /// Relies on the unique label constraint: concurrent callers with the same
    /// label serialize on the index and all get the one row.
    pub async fn find_or_insert(self, label: &str, conn: &mut PgConnection) -> sqlx::Result<Uuid> {
        let sql = format!(
            r#"
            INSERT INTO {table} (id, {column})
            VALUES ($1, $2)
            ON CONFLICT ({column}) DO UPDATE SET {column} = EXCLUDED.{column}
            RETURNING id
            "#,
            table = self.table(),
            column = self.column(),
        );

        sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(Uuid::now_v7())
            .bind(label)
            .fetch_one(conn)
            .await
    }

    /// Renames a row. Returns false if the row does not exist.
    pub async fn relabel<'e, E: PgExecutor<'e>>(self, id: Uuid, label: &str, db: E) -> sqlx::Result<bool> {
        let sql = format!(
            "UPDATE {} SET {} = $2 WHERE id = $1",
            self.table(),
            self.column()
        );
        let result = sqlx::query(&sql).bind(id).bind(label).execute(db).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_label<'e, E: PgExecutor<'e>>(self, id: Uuid, db: E) -> sqlx::Result<Option<String>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", self.column(), self.table());
        sqlx::query_scalar::<_, String>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_label<'e, E: PgExecutor<'e>>(self, label: &str, db: E) -> sqlx::Result<Option<Uuid>> {
        let sql = format!("SELECT id FROM {} WHERE {} = $1", self.table(), self.column());
        sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(label)
            .fetch_optional(db)
            .await
    }

    pub async fn count_label<'e, E: PgExecutor<'e>>(self, label: &str, db: E) -> sqlx::Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            self.table(),
            self.column()
        );
        sqlx::query_scalar::<_, i64>(&sql).bind(label).fetch_one(db).await
    }
}
