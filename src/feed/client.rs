//! HTTP client for the highlights feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{FeedError, FeedRecord, FeedSource, schema::parse_payload};
use crate::config::FeedConfig;
use crate::error::truncate_snippet;

const USER_AGENT: &str = concat!("highlights/", env!("CARGO_PKG_VERSION"));

/// Fetches the feed with a single GET; no retries and no caching.
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: Client,
    url: Url,
    token: Option<String>,
    provider: String,
}

impl HttpFeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let url = Url::parse(&config.url).map_err(|err| {
            FeedError::Configuration(format!("invalid feed url '{}': {err}", config.url))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url,
            token: config.token.clone(),
            provider: config.provider.clone(),
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        if let Some(token) = self.token.as_deref() {
            url.query_pairs_mut().append_pair("token", token);
        }
        url
    }
}

#[async_trait]
impl FeedSource for HttpFeedClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    #[instrument(skip(self), fields(provider = %self.provider, url = %self.url))]
    async fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError> {
        let response = self.client.get(self.request_url()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.ok().filter(|body| !body.is_empty());
            warn!(status = status.as_u16(), "Feed returned an error status");
            return Err(FeedError::Transport {
                status: status.as_u16(),
                body_snippet: body.map(|body| truncate_snippet(&body)),
            });
        }

        let body = response.bytes().await?;
        let records = parse_payload(&body)?;
        debug!(records = records.len(), "Fetched feed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_sent_as_query_parameter() {
        let config = FeedConfig {
            url: "https://feed.example.test/video-api/v3/".to_string(),
            token: Some("abc def".to_string()),
            ..Default::default()
        };
        let client = HttpFeedClient::new(&config).unwrap();
        assert_eq!(
            client.request_url().as_str(),
            "https://feed.example.test/video-api/v3/?token=abc+def"
        );
        assert_eq!(client.provider(), "scorebat");
    }

    #[test]
    fn rejects_invalid_url() {
        let config = FeedConfig {
            url: "::not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpFeedClient::new(&config),
            Err(FeedError::Configuration(_))
        ));
    }
}
