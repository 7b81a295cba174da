//! Per-author syndication view over the record store.
use std::sync::Arc;

use twitter_lexicon::Status;

use crate::config::PublicUrls;
use crate::error::{Result, SyndicatorError};
use crate::model::AuthorId;
use crate::storage::RecordStore;

mod atom;

pub use atom::AtomFeed;

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub author_name: String,
    pub profile_url: String,
    pub self_url: String,
    pub hub_url: String,
    /// RFC 3339 creation time of the newest entry.
    pub updated: String,
    /// Newest first.
    pub entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn title(&self) -> String {
        format!("Twitter Timeline Feed for {}", self.author_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub text: String,
    pub permalink: String,
    pub link: String,
    pub updated: String,
    pub author_name: String,
    pub author_uri: String,
}

impl FeedEntry {
    pub fn from_status(status: &Status) -> Result<Self> {
        Ok(Self {
            text: status.text().to_string(),
            permalink: status.permalink(),
            link: primary_link(status),
            updated: status.created_at()?.to_rfc3339(),
            author_name: status.user.name.clone(),
            author_uri: status.user.profile_url(),
        })
    }
}

/// A post sharing exactly one external link is represented by that link;
/// anything else points at the post itself.
pub fn primary_link(status: &Status) -> String {
    let mut links = status.external_links();
    match (links.next(), links.next()) {
        (Some(link), None) => link.to_string(),
        _ => status.permalink(),
    }
}

#[allow(missing_debug_implementations)]
pub struct FeedRenderer {
    records: Arc<dyn RecordStore>,
    urls: PublicUrls,
    hub_url: String,
    limit: usize,
}

impl FeedRenderer {
    pub fn new(records: Arc<dyn RecordStore>, urls: PublicUrls, hub_url: &str, limit: usize) -> Self {
        Self {
            records,
            urls,
            hub_url: hub_url.to_string(),
            limit,
        }
    }

    pub async fn render(&self, author_id: AuthorId) -> Result<Feed> {
        let records = self.records.query_by_author(author_id, self.limit).await?;
        let statuses = records
            .iter()
            .map(|record| record.status())
            .collect::<Result<Vec<_>, _>>()?;
        let Some(newest) = statuses.first() else {
            return Err(SyndicatorError::NotFound(author_id));
        };

        Ok(Feed {
            author_name: newest.user.name.clone(),
            profile_url: newest.user.profile_url(),
            self_url: self.urls.feed(author_id),
            hub_url: self.hub_url.clone(),
            updated: newest.created_at()?.to_rfc3339(),
            entries: statuses
                .iter()
                .map(FeedEntry::from_status)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}
