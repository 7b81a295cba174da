use std::sync::Arc;
use std::time::Duration;

use crate::config::{BirdfeedConfig, PublicUrls};
use crate::feed::FeedRenderer;
use crate::membership::MembershipManager;
use crate::notify::{NotificationFanout, Notifier};
use crate::storage::{CursorStore, RecordStore};
use crate::sync::SyncEngine;
use crate::upstream::Source;

/// Everything a request handler or the poller needs, built once at startup
/// and handed to rocket as managed state.
#[allow(missing_debug_implementations)]
pub struct AppContext {
    pub sync: Arc<SyncEngine>,
    pub membership: MembershipManager,
    pub renderer: FeedRenderer,
    pub urls: PublicUrls,
    /// `None` when polling is switched off.
    pub poll_every: Option<Duration>,
}

impl AppContext {
    pub fn new(
        config: &BirdfeedConfig,
        source: Arc<dyn Source>,
        cursors: Arc<dyn CursorStore>,
        records: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let urls = config.urls();
        let sync = SyncEngine::new(
            source.clone(),
            cursors.clone(),
            records.clone(),
            NotificationFanout::new(notifier),
            &config.list_name,
        );
        let membership = MembershipManager::new(
            source,
            cursors,
            records.clone(),
            &config.list_name,
            config.backfill_count,
        );
        let renderer = FeedRenderer::new(records, urls.clone(), &config.hub_url, config.feed_limit);

        Self {
            sync: Arc::new(sync),
            membership,
            renderer,
            urls,
            poll_every: (config.poll_interval > 0).then(|| Duration::from_secs(config.poll_interval)),
        }
    }
}
