//! The two logical tables: named cursors, and posts keyed by
//! `(author_id, post_id)`.
//!
//! Both stores are multi-writer safe per key and offer no cross-key
//! transactions; every write is an idempotent overwrite.
use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AuthorId, CursorValue, PostRecord};

mod memory;
mod surreal;

pub use memory::{MemoryCursorStore, MemoryRecordStore};
pub use surreal::SurrealStore;

#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Absent cursors are `Ok(None)`, not an error.
    async fn get(&self, name: &str) -> Result<Option<CursorValue>>;

    async fn put(&self, name: &str, value: CursorValue) -> Result<()>;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Overwrites each record by key. A failure may leave part of the batch
    /// written; re-sending the batch is safe.
    async fn upsert_batch(&self, records: &[PostRecord]) -> Result<()>;

    /// At most `limit` records for `author_id`, highest post id first.
    async fn query_by_author(&self, author_id: AuthorId, limit: usize) -> Result<Vec<PostRecord>>;
}
