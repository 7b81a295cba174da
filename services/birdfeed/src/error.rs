use rocket::{http::{ContentType, Status}, response::Responder};
use serde_json::json;
use std::io::Cursor;

use crate::model::AuthorId;

pub type Result<T, E = SyndicatorError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum SyndicatorError {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("No stored posts for author {0}")]
    NotFound(AuthorId),
    #[error("Store write failed: {0}")]
    StoreWriteFailure(String),
    #[error("Store read failed: {0}")]
    StoreReadFailure(String),
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("Malformed payload: {0}")]
    MalformedDocument(#[from] twitter_lexicon::LexiconError),
    #[error("Render failed: {0}")]
    RenderFailure(#[from] askama::Error),
}

impl From<reqwest::Error> for SyndicatorError {
    fn from(error: reqwest::Error) -> Self {
        SyndicatorError::UpstreamUnavailable(error.to_string())
    }
}

impl SyndicatorError {
    const fn kind(&self) -> &'static str {
        match self {
            SyndicatorError::UpstreamUnavailable(_) => "UpstreamUnavailable",
            SyndicatorError::NotFound(_) => "NotFound",
            SyndicatorError::StoreWriteFailure(_) => "StoreWriteFailure",
            SyndicatorError::StoreReadFailure(_) => "StoreReadFailure",
            SyndicatorError::InvalidHandle(_) => "InvalidHandle",
            SyndicatorError::MalformedPayload(_) | SyndicatorError::MalformedDocument(_) => "MalformedPayload",
            SyndicatorError::RenderFailure(_) => "RenderFailure",
        }
    }

    pub fn to_json(&self) -> String {
        json!({
            "error": self.kind(),
            "message": self.to_string(),
        }).to_string()
    }

    pub const fn status(&self) -> Status {
        match self {
            SyndicatorError::UpstreamUnavailable(_) => Status::BadGateway,
            SyndicatorError::NotFound(_) => Status::NotFound,
            SyndicatorError::StoreWriteFailure(_) | SyndicatorError::StoreReadFailure(_) => Status::ServiceUnavailable,
            SyndicatorError::InvalidHandle(_) => Status::BadRequest,
            SyndicatorError::MalformedPayload(_)
            | SyndicatorError::MalformedDocument(_)
            | SyndicatorError::RenderFailure(_) => Status::InternalServerError,
        }
    }
}

#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for SyndicatorError {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'static> {
        if self.status().code >= 500 {
            tracing::error!(error = %self, "request failed");
        }
        let body = self.to_json();
        rocket::Response::build()
            .status(self.status())
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status() {
        assert_eq!(SyndicatorError::NotFound(AuthorId(7)).status(), Status::NotFound);
        assert_eq!(SyndicatorError::InvalidHandle("a b".to_string()).status(), Status::BadRequest);
        assert_eq!(
            SyndicatorError::UpstreamUnavailable("timeout".to_string()).status(),
            Status::BadGateway
        );
        assert_eq!(
            SyndicatorError::StoreWriteFailure("rejected".to_string()).status(),
            Status::ServiceUnavailable
        );
    }

    #[test]
    fn test_error_json() {
        let body: serde_json::Value =
            serde_json::from_str(&SyndicatorError::NotFound(AuthorId(7)).to_json()).unwrap();
        assert_eq!(body["error"], "NotFound");
        assert_eq!(body["message"], "No stored posts for author 7");
    }
}
