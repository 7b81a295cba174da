use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use crate::config::PublicUrls;
use crate::error::{Result, SyndicatorError};
use crate::model::AuthorId;
use crate::APP_USER_AGENT;

/// Receives one "content updated" ping per author feed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, author_id: AuthorId) -> Result<()>;
}

/// WebSub publisher: tells a hub that an author's feed URL has new content.
#[derive(Debug, Clone)]
pub struct WebSubHub {
    client: reqwest::Client,
    hub_url: String,
    urls: PublicUrls,
}

impl WebSubHub {
    pub fn new(hub_url: &str, urls: PublicUrls) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            hub_url: hub_url.to_string(),
            urls,
        })
    }
}

#[async_trait]
impl Notifier for WebSubHub {
    async fn publish(&self, author_id: AuthorId) -> Result<()> {
        let topic = self.urls.feed(author_id);
        let res = self
            .client
            .post(&self.hub_url)
            .form(&[("hub.mode", "publish"), ("hub.url", topic.as_str())])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(SyndicatorError::UpstreamUnavailable(format!(
                "hub rejected {topic}: {}",
                res.status()
            )));
        }
        Ok(())
    }
}

/// Best-effort fanout. Failures are logged and dropped so a flaky hub can
/// never fail a sync.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct NotificationFanout {
    notifier: Arc<dyn Notifier>,
}

impl NotificationFanout {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Pings every author concurrently and returns how many pings succeeded.
    pub async fn notify(&self, author_ids: &BTreeSet<AuthorId>) -> usize {
        let results = join_all(author_ids.iter().map(|&author_id| async move {
            match self.notifier.publish(author_id).await {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(%author_id, %error, "update ping failed");
                    false
                }
            }
        }))
        .await;
        results.into_iter().filter(|delivered| *delivered).count()
    }
}
