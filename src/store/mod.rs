//! Document store contract the interview repository persists through.
//!
//! Documents live in named collections, scoped by the owning identity. The
//! store assigns `id` and `created_at`; `patch` is a shallow merge of
//! top-level fields and never touches either of them.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub data: JsonValue,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of `owner` in `collection`, in insertion order.
    async fn get_all(&self, owner: &str, collection: &str) -> Result<Vec<Document>>;

    async fn get(&self, owner: &str, collection: &str, id: Uuid) -> Result<Option<Document>>;

    async fn create(&self, owner: &str, collection: &str, data: JsonValue) -> Result<Document>;

    /// Returns `None` when no such document is owned by `owner`.
    async fn patch(
        &self,
        owner: &str,
        collection: &str,
        id: Uuid,
        fields: Map<String, JsonValue>,
    ) -> Result<Option<Document>>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, owner: &str, collection: &str, id: Uuid) -> Result<bool>;
}

/// Shallow merge used by stores that patch in process.
pub(crate) fn merge_fields(target: &mut JsonValue, fields: Map<String, JsonValue>) {
    match target {
        JsonValue::Object(existing) => existing.extend(fields),
        other => *other = JsonValue::Object(fields),
    }
}
