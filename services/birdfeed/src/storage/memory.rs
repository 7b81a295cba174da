use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CursorStore, RecordStore};
use crate::error::Result;
use crate::model::{AuthorId, CursorValue, PostId, PostRecord};

#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursors: RwLock<HashMap<String, CursorValue>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn get(&self, name: &str) -> Result<Option<CursorValue>> {
        Ok(self.cursors.read().await.get(name).cloned())
    }

    async fn put(&self, name: &str, value: CursorValue) -> Result<()> {
        self.cursors.write().await.insert(name.to_string(), value);
        Ok(())
    }
}

/// Posts ordered by `(author_id, post_id)`, so one author's posts form a
/// contiguous range.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    posts: RwLock<BTreeMap<(AuthorId, PostId), String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn upsert_batch(&self, records: &[PostRecord]) -> Result<()> {
        let mut posts = self.posts.write().await;
        for record in records {
            posts.insert(record.key(), record.payload.clone());
        }
        Ok(())
    }

    async fn query_by_author(&self, author_id: AuthorId, limit: usize) -> Result<Vec<PostRecord>> {
        let posts = self.posts.read().await;
        Ok(posts
            .range((author_id, PostId(u64::MIN))..=(author_id, PostId(u64::MAX)))
            .rev()
            .take(limit)
            .map(|(&(author_id, post_id), payload)| PostRecord {
                author_id,
                post_id,
                payload: payload.clone(),
            })
            .collect())
    }
}
