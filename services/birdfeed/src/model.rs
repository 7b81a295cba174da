use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use rocket::request::FromParam;
use serde::{Deserialize, Serialize};
use twitter_lexicon::Status;

/// Cursor holding the highest post id stored by the poller.
pub const SINCE_ID: &str = "sinceId";
/// Cursor caching the upstream id of the tracked list.
pub const LIST_ID: &str = "listId";

macro_rules! numeric_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl<'a> FromParam<'a> for $name {
            type Error = ParseIntError;

            fn from_param(param: &'a str) -> Result<Self, Self::Error> {
                param.parse()
            }
        }
    };
}

numeric_id!(AuthorId);
numeric_id!(PostId);

/// A named watermark value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CursorValue {
    Id(u64),
    Text(String),
}

impl CursorValue {
    pub fn as_id(&self) -> Option<u64> {
        match self {
            CursorValue::Id(id) => Some(*id),
            CursorValue::Text(text) => text.parse().ok(),
        }
    }
}

impl fmt::Display for CursorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorValue::Id(id) => fmt::Display::fmt(id, f),
            CursorValue::Text(text) => f.write_str(text),
        }
    }
}

/// One harvested post, stored once per `(author_id, post_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub author_id: AuthorId,
    pub post_id: PostId,
    /// The upstream document, serialized as JSON.
    pub payload: String,
}

impl PostRecord {
    pub fn from_status(status: &Status) -> Result<Self, serde_json::Error> {
        Ok(Self {
            author_id: AuthorId(status.user.id),
            post_id: PostId(status.id),
            payload: serde_json::to_string(status)?,
        })
    }

    pub const fn key(&self) -> (AuthorId, PostId) {
        (self.author_id, self.post_id)
    }

    pub fn status(&self) -> Result<Status, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}
