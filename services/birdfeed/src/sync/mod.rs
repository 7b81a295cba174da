//! One polling cycle: resolve the list, read the cursor, fetch, store,
//! advance the cursor, then ping subscribers.
//!
//! The cursor only moves after the batch is durably stored, so everything at
//! or below `sinceId` is known to be in the record store. A failed cycle
//! leaves the cursor where it was and the next trigger refetches.
use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use twitter_lexicon::Status;

use crate::error::{Result, SyndicatorError};
use crate::model::{AuthorId, CursorValue, PostId, PostRecord, SINCE_ID};
use crate::notify::NotificationFanout;
use crate::storage::{CursorStore, RecordStore};
use crate::upstream::Source;

mod list;

pub use list::resolve_list_id;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The fetch came back empty.
    None,
    /// The raw batch that was stored.
    Synced(Vec<Status>),
    /// Another cycle holds the lock; nothing was read or written.
    InFlight,
}

#[allow(missing_debug_implementations)]
pub struct SyncEngine {
    source: Arc<dyn Source>,
    cursors: Arc<dyn CursorStore>,
    records: Arc<dyn RecordStore>,
    fanout: NotificationFanout,
    list_name: String,
    in_flight: Mutex<()>,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn Source>,
        cursors: Arc<dyn CursorStore>,
        records: Arc<dyn RecordStore>,
        fanout: NotificationFanout,
        list_name: &str,
    ) -> Self {
        Self {
            source,
            cursors,
            records,
            fanout,
            list_name: list_name.to_string(),
            in_flight: Mutex::new(()),
        }
    }

    /// Runs one cycle unless one is already running.
    pub async fn run_cycle(&self) -> Result<SyncOutcome> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::info!("sync already in flight, skipping");
            return Ok(SyncOutcome::InFlight);
        };

        match self.cycle().await {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                tracing::error!(%error, "sync aborted, cursor unchanged");
                Err(error)
            }
        }
    }

    async fn cycle(&self) -> Result<SyncOutcome> {
        let list_id = resolve_list_id(self.cursors.as_ref(), self.source.as_ref(), &self.list_name).await?;
        tracing::debug!(%list_id, "list resolved");

        let since_id = self.since_id().await?;
        tracing::debug!(?since_id, "cursor resolved");

        let batch = self.fetch(&list_id, since_id).await?;
        if batch.is_empty() {
            tracing::debug!("nothing new");
            return Ok(SyncOutcome::None);
        }

        let records = batch
            .iter()
            .map(PostRecord::from_status)
            .collect::<Result<Vec<_>, _>>()?;
        self.records.upsert_batch(&records).await?;
        tracing::debug!(count = records.len(), "batch stored");

        let cursor = self.advance_cursor(since_id, &records).await?;

        let authors: BTreeSet<AuthorId> = records.iter().map(|record| record.author_id).collect();
        let notified = self.fanout.notify(&authors).await;

        tracing::info!(
            stored = records.len(),
            %cursor,
            authors = authors.len(),
            notified,
            "sync complete"
        );
        Ok(SyncOutcome::Synced(batch))
    }

    /// A stored cursor that is not an id aborts the cycle instead of
    /// refetching from scratch.
    async fn since_id(&self) -> Result<Option<PostId>> {
        match self.cursors.get(SINCE_ID).await? {
            None => Ok(None),
            Some(value) => value.as_id().map(|id| Some(PostId(id))).ok_or_else(|| {
                SyndicatorError::StoreReadFailure(format!("cursor {SINCE_ID} holds non-numeric value {value}"))
            }),
        }
    }

    /// Items at or below the cursor are already stored and are dropped even
    /// if upstream hands them back.
    async fn fetch(&self, list_id: &str, since_id: Option<PostId>) -> Result<Vec<Status>> {
        let mut batch = self.source.list_items(list_id, since_id).await?;
        if let Some(PostId(floor)) = since_id {
            let fetched = batch.len();
            batch.retain(|status| status.id > floor);
            if batch.len() < fetched {
                tracing::warn!(
                    dropped = fetched - batch.len(),
                    %floor,
                    "upstream returned items at or below the cursor"
                );
            }
        }
        tracing::debug!(count = batch.len(), "fetched");
        Ok(batch)
    }

    async fn advance_cursor(&self, since_id: Option<PostId>, records: &[PostRecord]) -> Result<PostId> {
        let cursor = records
            .iter()
            .map(|record| record.post_id)
            .chain(since_id)
            .max()
            .unwrap_or(PostId(0));
        if Some(cursor) != since_id {
            self.cursors.put(SINCE_ID, CursorValue::Id(cursor.0)).await?;
        }
        Ok(cursor)
    }
}
