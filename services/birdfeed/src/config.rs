use rocket::figment::{providers::Env, Figment};
use rocket::serde::Deserialize;

use crate::model::AuthorId;
use crate::upstream::OAuthCredentials;

pub const DEFAULT_LIST_NAME: &str = "use_to_feed";
pub const DEFAULT_HUB_URL: &str = "https://pubsubhubbub.appspot.com/";
pub const DEFAULT_HUB_PUBLISH_URL: &str = "https://pubsubhubbub.appspot.com/publish";
pub const DEFAULT_API_URL: &str = "https://api.twitter.com/1.1";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Surreal,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(crate = "rocket::serde")]
pub struct TwitterConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(flatten)]
    pub credentials: OAuthCredentials,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(crate = "rocket::serde")]
pub struct BirdfeedConfig {
    /// Base URL the service is reachable at, without a trailing slash.
    pub public_url: String,
    #[serde(default = "default_list_name")]
    pub list_name: String,
    /// Seconds between sync cycles, `0` turns the poller off.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Hub advertised in every feed's `rel="hub"` link.
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    /// Endpoint the publish pings are posted to.
    #[serde(default = "default_hub_publish_url")]
    pub hub_publish_url: String,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,
    #[serde(default = "default_backfill_count")]
    pub backfill_count: usize,
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,
    pub twitter: TwitterConfig,
    pub database: Option<deadpool_surrealdb::Config>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_list_name() -> String {
    DEFAULT_LIST_NAME.to_string()
}

const fn default_poll_interval() -> u64 {
    300
}

fn default_hub_url() -> String {
    DEFAULT_HUB_URL.to_string()
}

fn default_hub_publish_url() -> String {
    DEFAULT_HUB_PUBLISH_URL.to_string()
}

const fn default_feed_limit() -> usize {
    50
}

const fn default_backfill_count() -> usize {
    50
}

const fn default_storage() -> StorageBackend {
    StorageBackend::Surreal
}

impl BirdfeedConfig {
    /// Rocket's own sources (`Rocket.toml`, `ROCKET_*`) overlaid with
    /// `BIRDFEED_*` variables, `__` separating nested keys.
    pub fn figment() -> Figment {
        rocket::Config::figment().merge(Env::prefixed("BIRDFEED_").split("__"))
    }

    pub fn urls(&self) -> PublicUrls {
        PublicUrls::new(&self.public_url)
    }
}

/// Absolute URLs handed out in redirects, feed documents and hub pings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrls {
    base: String,
}

impl PublicUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn feed(&self, author_id: AuthorId) -> String {
        format!("{}/id/{}", self.base, author_id)
    }

    pub fn add(&self, author_id: AuthorId) -> String {
        format!("{}/add/id/{}", self.base, author_id)
    }
}
