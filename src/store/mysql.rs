//! MySQL-backed document store
//!
//! Documents live in a single `documents` table (see `migrations/`), keyed by
//! `(collection, id)` with their fields in a JSON column. `seq` records
//! insertion order and is the natural order of query results.

use super::{validate_field_name, Document, DocumentStore, Fields};
use crate::domain::user::{APPLE_IDENTIFIER_FIELD, EMAIL_FIELD};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::MySqlPool;

pub struct MySqlDocumentStore {
    pool: MySqlPool,
}

impl MySqlDocumentStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }
}

/// JSON path addressing a top-level field
fn json_path(field: &str) -> String {
    format!("$.{}", field)
}

/// Indexed generated column holding `field`, when the schema has one
fn indexed_column(field: &str, value: &str) -> Option<&'static str> {
    match field {
        EMAIL_FIELD => Some("email"),
        // the column stores empty identifiers as NULL
        APPLE_IDENTIFIER_FIELD if !value.is_empty() => Some("apple_identifier"),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MySqlDocumentStore {
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        validate_field_name(field)?;

        let rows = match indexed_column(field, value) {
            Some(column) => {
                let sql = format!(
                    r#"
                    SELECT id, data
                    FROM documents
                    WHERE collection = ? AND {} = ?
                    ORDER BY seq
                    "#,
                    column
                );
                sqlx::query_as::<_, (String, Json<Fields>)>(&sql)
                    .bind(collection)
                    .bind(value)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, (String, Json<Fields>)>(
                    r#"
                    SELECT id, data
                    FROM documents
                    WHERE collection = ?
                      AND JSON_UNQUOTE(JSON_EXTRACT(data, ?)) = ?
                    ORDER BY seq
                    "#,
                )
                .bind(collection)
                .bind(json_path(field))
                .bind(value)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(id, Json(fields))| Document::new(id, fields))
            .collect())
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        for field in fields.keys() {
            validate_field_name(field)?;
        }

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = JSON_MERGE_PATCH(data, ?)
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(Json(fields))
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        // MySQL reports zero affected rows when the patch changes nothing
        if result.rows_affected() == 0 && !self.exists(collection, id).await? {
            return Err(AppError::Store(format!(
                "Document '{}/{}' does not exist",
                collection, id
            )));
        }

        Ok(())
    }

    async fn create_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        for field in fields.keys() {
            validate_field_name(field)?;
        }

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
