use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Document, DocumentStore};
use crate::error::Result;

/// Documents kept as JSONB rows in the `documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_all(&self, owner: &str, collection: &str) -> Result<Vec<Document>> {
        let docs = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, created_at, data
            FROM documents
            WHERE owner = $1 AND collection = $2
            ORDER BY seq
            "#,
        )
        .bind(owner)
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(docs)
    }

    async fn get(&self, owner: &str, collection: &str, id: Uuid) -> Result<Option<Document>> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, created_at, data
            FROM documents
            WHERE owner = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc)
    }

    async fn create(&self, owner: &str, collection: &str, data: JsonValue) -> Result<Document> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, owner, collection, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, data
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(collection)
        .bind(data)
        .fetch_one(&self.pool)
        .await?;

        Ok(doc)
    }

    async fn patch(
        &self,
        owner: &str,
        collection: &str,
        id: Uuid,
        fields: Map<String, JsonValue>,
    ) -> Result<Option<Document>> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET data = data || $4, updated_at = NOW()
            WHERE owner = $1 AND collection = $2 AND id = $3
            RETURNING id, created_at, data
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .bind(JsonValue::Object(fields))
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc)
    }

    async fn delete(&self, owner: &str, collection: &str, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "DELETE FROM documents WHERE owner = $1 AND collection = $2 AND id = $3",
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }
}
