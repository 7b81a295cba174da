use async_trait::async_trait;
use twitter_lexicon::Status;

use crate::error::Result;
use crate::model::{AuthorId, PostId};

mod oauth;
mod twitter;

pub use oauth::OAuthCredentials;
pub use twitter::TwitterClient;

/// The social platform we harvest from.
#[async_trait]
pub trait Source: Send + Sync {
    /// Posts on the list with an id strictly greater than `since_id`, or the
    /// most recent page when `since_id` is `None`.
    async fn list_items(&self, list_id: &str, since_id: Option<PostId>) -> Result<Vec<Status>>;

    async fn resolve_list_id(&self, name: &str) -> Result<String>;

    async fn resolve_author_id(&self, handle: &str) -> Result<AuthorId>;

    async fn user_timeline(&self, author_id: AuthorId, count: usize) -> Result<Vec<Status>>;

    async fn add_list_member(&self, list_id: &str, author_id: AuthorId) -> Result<()>;
}
