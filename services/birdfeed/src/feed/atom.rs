use askama::Template;

use super::Feed;
use crate::error::Result;

/// Atom 1.0 serialization of a [`Feed`], escaped for XML.
#[derive(Template)]
#[template(path = "feed.xml")]
pub struct AtomFeed<'a> {
    feed: &'a Feed,
}

impl<'a> AtomFeed<'a> {
    pub const MEDIA_TYPE: (&'static str, &'static str) = ("application", "atom+xml");

    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    pub fn to_xml(&self) -> Result<String> {
        Ok(self.render()?)
    }
}
