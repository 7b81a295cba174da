use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use twitter_lexicon::{Status, TwitterList, User};
use url::Url;

use super::{OAuthCredentials, Source};
use crate::error::{Result, SyndicatorError};
use crate::model::{AuthorId, PostId};
use crate::APP_USER_AGENT;

/// v1.1 REST client, authenticated as the list owner.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
    api_url: String,
    credentials: OAuthCredentials,
}

impl TwitterClient {
    pub fn new(api_url: &str, credentials: OAuthCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}/{}", self.api_url, path), params)
            .map_err(|e| SyndicatorError::UpstreamUnavailable(format!("invalid endpoint {path}: {e}")))
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response> {
        let authorization = self.credentials.authorization(method.as_str(), &url)?;
        tracing::debug!(%method, path = url.path(), "upstream request");
        let res = self
            .client
            .request(method, url.clone())
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SyndicatorError::UpstreamUnavailable(format!(
                "{} returned {}: {}",
                url.path(),
                status,
                body
            )));
        }
        Ok(res)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path, params)?;
        Ok(self.send(Method::GET, url).await?.json::<T>().await?)
    }
}

#[async_trait]
impl Source for TwitterClient {
    async fn list_items(&self, list_id: &str, since_id: Option<PostId>) -> Result<Vec<Status>> {
        let mut params = vec![
            ("tweet_mode", "extended".to_string()),
            ("list_id", list_id.to_string()),
        ];
        if let Some(since_id) = since_id {
            params.push(("since_id", since_id.to_string()));
        }
        self.get("lists/statuses.json", &params).await
    }

    async fn resolve_list_id(&self, name: &str) -> Result<String> {
        tracing::info!(name, "resolving list id");
        let lists: Vec<TwitterList> = self.get("lists/list.json", &[]).await?;
        lists
            .into_iter()
            .find(|list| list.name == name)
            .map(|list| list.id_str)
            .ok_or_else(|| SyndicatorError::UpstreamUnavailable(format!("no list named '{name}'")))
    }

    async fn resolve_author_id(&self, handle: &str) -> Result<AuthorId> {
        let user: User = self
            .get("users/show.json", &[("screen_name", handle.to_string())])
            .await?;
        Ok(AuthorId(user.id))
    }

    async fn user_timeline(&self, author_id: AuthorId, count: usize) -> Result<Vec<Status>> {
        self.get(
            "statuses/user_timeline.json",
            &[
                ("tweet_mode", "extended".to_string()),
                ("count", count.to_string()),
                ("user_id", author_id.to_string()),
            ],
        )
        .await
    }

    async fn add_list_member(&self, list_id: &str, author_id: AuthorId) -> Result<()> {
        let url = self.endpoint(
            "lists/members/create.json",
            &[("list_id", list_id.to_string()), ("user_id", author_id.to_string())],
        )?;
        self.send(Method::POST, url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::status_json;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TwitterClient {
        TwitterClient::new(
            &server.uri(),
            OAuthCredentials {
                consumer_key: "key".to_string(),
                consumer_secret: "secret".to_string(),
                access_token: "token".to_string(),
                access_token_secret: "token-secret".to_string(),
            },
        )
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_list_items_since_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists/statuses.json"))
            .and(query_param("list_id", "99"))
            .and(query_param("since_id", "103"))
            .and(query_param("tweet_mode", "extended"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                status_json(7, 105, "newer"),
                status_json(8, 104, "new"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let items = client(&server).list_items("99", Some(PostId(103))).await.unwrap();
        let ids: Vec<u64> = items.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![105, 104]);
        assert_eq!(items[1].user.id, 8);
    }

    #[actix_rt::test]
    async fn test_list_items_without_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists/statuses.json"))
            .and(query_param_is_missing("since_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client(&server).list_items("99", None).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_resolve_list_id_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "id_str": "1", "name": "friends" },
                { "id": 1130185227375038465u64, "id_str": "1130185227375038465", "name": "use_to_feed" },
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_eq!(client.resolve_list_id("use_to_feed").await.unwrap(), "1130185227375038465");
        assert!(matches!(
            client.resolve_list_id("missing").await,
            Err(SyndicatorError::UpstreamUnavailable(_))
        ));
    }

    #[actix_rt::test]
    async fn test_resolve_author_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/show.json"))
            .and(query_param("screen_name", "jack"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 12, "id_str": "12", "name": "jack", "screen_name": "jack"
            })))
            .mount(&server)
            .await;

        assert_eq!(client(&server).resolve_author_id("jack").await.unwrap(), AuthorId(12));
    }

    #[actix_rt::test]
    async fn test_user_timeline_and_add_member() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/statuses/user_timeline.json"))
            .and(query_param("user_id", "42"))
            .and(query_param("count", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([status_json(42, 9, "hi")])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/lists/members/create.json"))
            .and(query_param("list_id", "99"))
            .and(query_param("user_id", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client.add_list_member("99", AuthorId(42)).await.unwrap();
        let timeline = client.user_timeline(AuthorId(42), 50).await.unwrap();
        assert_eq!(timeline.len(), 1);
    }

    #[actix_rt::test]
    async fn test_error_status_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Could not authenticate you."))
            .mount(&server)
            .await;

        let err = client(&server).list_items("99", None).await.unwrap_err();
        match err {
            SyndicatorError::UpstreamUnavailable(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Could not authenticate you."));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
