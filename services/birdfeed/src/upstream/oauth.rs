//! OAuth 1.0a request signing (HMAC-SHA1) for user-context API calls.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use sha1::Sha1;
use url::Url;
use urlencoding::encode;

use crate::error::{Result, SyndicatorError};

#[derive(Clone, Deserialize)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

impl OAuthCredentials {
    /// `Authorization` header value for a request whose parameters are all in
    /// the query string of `url`.
    pub fn authorization(&self, method: &str, url: &Url) -> Result<String> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_with(method, url, &[], &nonce, &timestamp)
    }

    fn authorization_with(
        &self,
        method: &str,
        url: &Url,
        body: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];
        let signature = self.signature(method, url, body, &oauth)?;
        oauth.push(("oauth_signature", signature.as_str()));
        oauth.sort_unstable();

        let fields = oauth
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn signature(
        &self,
        method: &str,
        url: &Url,
        body: &[(&str, &str)],
        oauth: &[(&str, &str)],
    ) -> Result<String> {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (encode(&key).into_owned(), encode(&value).into_owned()))
            .chain(
                body.iter()
                    .chain(oauth)
                    .map(|(key, value)| (encode(key).into_owned(), encode(value).into_owned())),
            )
            .collect();
        params.sort_unstable();
        let param_string = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut base_url = url.clone();
        base_url.set_query(None);
        base_url.set_fragment(None);
        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(base_url.as_str()),
            encode(&param_string)
        );

        let key = format!("{}&{}", encode(&self.consumer_secret), encode(&self.access_token_secret));
        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|e| SyndicatorError::UpstreamUnavailable(format!("cannot sign request: {e}")))?;
        mac.update(base_string.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}
