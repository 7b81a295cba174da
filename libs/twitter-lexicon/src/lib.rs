#[macro_use]
extern crate serde_derive;

pub mod com;

pub use com::twitter::list::TwitterList;
pub use com::twitter::status::{Entities, Status, UrlEntity, CREATED_AT_FORMAT};
pub use com::twitter::user::User;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Invalid created_at timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}
