//! Fixtures and fakes shared by unit tests.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rocket::figment::providers::{Format, Toml};
use rocket::figment::Figment;
use serde_json::{json, Value};
use twitter_lexicon::Status;

use crate::config::BirdfeedConfig;
use crate::error::{Result, SyndicatorError};
use crate::model::{AuthorId, CursorValue, PostId, PostRecord};
use crate::notify::Notifier;
use crate::storage::{CursorStore, RecordStore};
use crate::upstream::Source;

/// In-memory storage, no polling, fixed public URL.
pub fn config() -> BirdfeedConfig {
    Figment::from(Toml::string(
        r#"
        public_url = "https://feeds.example.com"
        poll_interval = 0
        storage = "memory"

        [twitter]
        consumer_key = "ck"
        consumer_secret = "cs"
        access_token = "at"
        access_token_secret = "ats"
        "#,
    ))
    .extract()
    .unwrap()
}

pub fn status_json(author: u64, id: u64, text: &str) -> Value {
    json!({
        "id": id,
        "id_str": id.to_string(),
        "created_at": format!("Wed Oct 10 20:{:02}:{:02} +0000 2018", (id / 60) % 60, id % 60),
        "full_text": text,
        "user": {
            "id": author,
            "id_str": author.to_string(),
            "name": format!("Author {author}"),
            "screen_name": format!("author{author}"),
        },
        "entities": { "hashtags": [], "urls": [] },
    })
}

pub fn status(author: u64, id: u64, text: &str) -> Status {
    serde_json::from_value(status_json(author, id, text)).unwrap()
}

pub fn with_links(mut status: Status, links: &[&str]) -> Status {
    status.entities.urls = links
        .iter()
        .map(|link| {
            serde_json::from_value(json!({
                "url": "https://t.co/short",
                "expanded_url": link,
            }))
            .unwrap()
        })
        .collect();
    status
}

/// Scripted upstream. `list_items` honours `since_id` the way the real API
/// does, returning only queued items with a greater id.
#[derive(Default)]
pub struct FakeSource {
    pub list_id: String,
    pub items: Mutex<Vec<Status>>,
    pub timelines: Mutex<HashMap<AuthorId, Vec<Status>>>,
    pub handles: HashMap<String, AuthorId>,
    pub members: Mutex<Vec<(String, AuthorId)>>,
    pub fail_fetch: Mutex<bool>,
    /// Misbehave by returning everything queued, ignoring `since_id`.
    pub ignore_since: bool,
    pub list_lookups: AtomicUsize,
    pub fetches: Mutex<Vec<Option<PostId>>>,
}

impl FakeSource {
    pub fn new(list_id: &str) -> Self {
        Self {
            list_id: list_id.to_string(),
            ..Default::default()
        }
    }

    pub fn push(&self, statuses: Vec<Status>) {
        self.items.lock().unwrap().extend(statuses);
    }

    pub fn list_lookups(&self) -> usize {
        self.list_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for FakeSource {
    async fn list_items(&self, list_id: &str, since_id: Option<PostId>) -> Result<Vec<Status>> {
        assert_eq!(list_id, self.list_id);
        self.fetches.lock().unwrap().push(since_id);
        if *self.fail_fetch.lock().unwrap() {
            return Err(SyndicatorError::UpstreamUnavailable("connection reset".to_string()));
        }
        let floor = match since_id {
            Some(id) if !self.ignore_since => id.0,
            _ => 0,
        };
        let mut items: Vec<Status> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|status| status.id > floor)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn resolve_list_id(&self, _name: &str) -> Result<String> {
        self.list_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.list_id.clone())
    }

    async fn resolve_author_id(&self, handle: &str) -> Result<AuthorId> {
        self.handles
            .get(handle)
            .copied()
            .ok_or_else(|| SyndicatorError::UpstreamUnavailable(format!("no user {handle}")))
    }

    async fn user_timeline(&self, author_id: AuthorId, count: usize) -> Result<Vec<Status>> {
        let timelines = self.timelines.lock().unwrap();
        Ok(timelines
            .get(&author_id)
            .map(|items| items.iter().take(count).cloned().collect())
            .unwrap_or_default())
    }

    async fn add_list_member(&self, list_id: &str, author_id: AuthorId) -> Result<()> {
        self.members.lock().unwrap().push((list_id.to_string(), author_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub pings: Mutex<Vec<AuthorId>>,
    pub fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, author_id: AuthorId) -> Result<()> {
        self.pings.lock().unwrap().push(author_id);
        if self.fail {
            return Err(SyndicatorError::UpstreamUnavailable("hub down".to_string()));
        }
        Ok(())
    }
}

impl RecordingNotifier {
    pub fn sorted_pings(&self) -> Vec<AuthorId> {
        let mut pings = self.pings.lock().unwrap().clone();
        pings.sort();
        pings
    }
}

/// Wraps a store, counting writes and optionally rejecting them.
pub struct CountingStore<S> {
    pub inner: S,
    pub writes: AtomicUsize,
    pub reject_writes: bool,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
            reject_writes: false,
        }
    }

    pub fn rejecting(inner: S) -> Self {
        Self {
            reject_writes: true,
            ..Self::new(inner)
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes {
            return Err(SyndicatorError::StoreWriteFailure("throttled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: CursorStore> CursorStore for CountingStore<S> {
    async fn get(&self, name: &str) -> Result<Option<CursorValue>> {
        self.inner.get(name).await
    }

    async fn put(&self, name: &str, value: CursorValue) -> Result<()> {
        self.write()?;
        self.inner.put(name, value).await
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for CountingStore<S> {
    async fn upsert_batch(&self, records: &[PostRecord]) -> Result<()> {
        self.write()?;
        self.inner.upsert_batch(records).await
    }

    async fn query_by_author(&self, author_id: AuthorId, limit: usize) -> Result<Vec<PostRecord>> {
        self.inner.query_by_author(author_id, limit).await
    }
}
