use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use super::user::User;
use super::WEB_HOST;
use crate::LexiconError;

/// Format of `created_at`, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A single post. Fields we never read are kept in `extra` so the document
/// serializes back to the shape the API returned.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Status {
    pub id: u64,
    pub id_str: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub user: User,
    #[serde(default)]
    pub entities: Entities,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UrlEntity {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UrlEntity {
    /// The resolved target, falling back to the shortened link.
    pub fn target(&self) -> &str {
        self.expanded_url.as_deref().unwrap_or(&self.url)
    }
}

impl Status {
    /// Extended-mode text when present, otherwise the legacy truncated text.
    pub fn text(&self) -> &str {
        self.full_text
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }

    pub fn created_at(&self) -> Result<DateTime<FixedOffset>, LexiconError> {
        DateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT).map_err(|source| {
            LexiconError::InvalidTimestamp {
                value: self.created_at.clone(),
                source,
            }
        })
    }

    pub fn permalink(&self) -> String {
        format!("{}/{}/status/{}", WEB_HOST, self.user.screen_name, self.id_str)
    }

    pub fn external_links(&self) -> impl Iterator<Item = &str> {
        self.entities.urls.iter().map(UrlEntity::target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const SAMPLE: &str = r#"{
        "id": 1050118621198921728,
        "id_str": "1050118621198921728",
        "created_at": "Wed Oct 10 20:19:24 +0000 2018",
        "full_text": "To make room for more expression, we will now count all emojis as equal",
        "truncated": false,
        "user": {
            "id": 6253282,
            "id_str": "6253282",
            "name": "Twitter API",
            "screen_name": "TwitterAPI",
            "verified": true
        },
        "entities": {
            "hashtags": [],
            "urls": [
                {
                    "url": "https://t.co/MkGjXf9aXm",
                    "expanded_url": "https://twittercommunity.com/t/114607",
                    "display_url": "twittercommunity.com/t/114607"
                }
            ]
        },
        "retweet_count": 161
    }"#;

    #[test]
    fn test_status_decode() {
        let status: Status = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(status.id, 1050118621198921728);
        assert_eq!(status.user.id, 6253282);
        assert_eq!(status.user.screen_name, "TwitterAPI");
        assert_eq!(
            status.text(),
            "To make room for more expression, we will now count all emojis as equal"
        );
        assert_eq!(
            status.permalink(),
            "https://twitter.com/TwitterAPI/status/1050118621198921728"
        );
        assert_eq!(
            status.external_links().collect::<Vec<_>>(),
            vec!["https://twittercommunity.com/t/114607"]
        );
    }

    #[test]
    fn test_status_keeps_unknown_fields() {
        let status: Status = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["retweet_count"], 161);
        assert_eq!(value["truncated"], false);
        assert_eq!(value["user"]["verified"], true);
        assert_eq!(value["entities"]["hashtags"], serde_json::json!([]));
    }

    #[test]
    fn test_status_created_at() {
        let status: Status = serde_json::from_str(SAMPLE).unwrap();
        let created_at = status.created_at().unwrap();
        assert_eq!(
            created_at,
            Utc.with_ymd_and_hms(2018, 10, 10, 20, 19, 24).unwrap()
        );

        let mut broken = status.clone();
        broken.created_at = "yesterday".to_string();
        assert!(matches!(
            broken.created_at(),
            Err(LexiconError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_status_text_fallback() {
        let mut status: Status = serde_json::from_str(SAMPLE).unwrap();
        status.full_text = None;
        status.text = Some("legacy".to_string());
        assert_eq!(status.text(), "legacy");

        status.text = None;
        assert_eq!(status.text(), "");
    }

    #[test]
    fn test_url_entity_target_fallback() {
        let entity = UrlEntity {
            url: "https://t.co/abc".to_string(),
            expanded_url: None,
            display_url: None,
            extra: Map::new(),
        };
        assert_eq!(entity.target(), "https://t.co/abc");
    }
}
