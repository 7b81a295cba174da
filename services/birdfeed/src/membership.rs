use std::sync::Arc;

use crate::error::Result;
use crate::handle::normalize_and_validate_handle;
use crate::model::{AuthorId, PostRecord};
use crate::storage::{CursorStore, RecordStore};
use crate::sync::resolve_list_id;
use crate::upstream::Source;

/// Adds authors to the tracked list and seeds their feeds.
#[allow(missing_debug_implementations)]
pub struct MembershipManager {
    source: Arc<dyn Source>,
    cursors: Arc<dyn CursorStore>,
    records: Arc<dyn RecordStore>,
    list_name: String,
    backfill_count: usize,
}

impl MembershipManager {
    pub fn new(
        source: Arc<dyn Source>,
        cursors: Arc<dyn CursorStore>,
        records: Arc<dyn RecordStore>,
        list_name: &str,
        backfill_count: usize,
    ) -> Self {
        Self {
            source,
            cursors,
            records,
            list_name: list_name.to_string(),
            backfill_count,
        }
    }

    /// Adds `author_id` to the list, then stores their recent timeline so
    /// the feed renders before the next poll. Returns the number of posts
    /// backfilled. The `sinceId` cursor is never touched here.
    pub async fn track_author(&self, author_id: AuthorId) -> Result<usize> {
        let list_id = resolve_list_id(self.cursors.as_ref(), self.source.as_ref(), &self.list_name).await?;
        self.source.add_list_member(&list_id, author_id).await?;

        let timeline = self.source.user_timeline(author_id, self.backfill_count).await?;
        let records = timeline
            .iter()
            .map(PostRecord::from_status)
            .collect::<Result<Vec<_>, _>>()?;
        if !records.is_empty() {
            self.records.upsert_batch(&records).await?;
        }
        tracing::info!(%author_id, %list_id, backfilled = records.len(), "tracking author");
        Ok(records.len())
    }

    /// Uncached lookup of a screen name.
    pub async fn resolve_author_id(&self, handle: &str) -> Result<AuthorId> {
        let handle = normalize_and_validate_handle(handle)?;
        self.source.resolve_author_id(&handle).await
    }
}
