//! Highlights feed provider.
//!
//! [`FeedSource`] is the seam between ingestion and the upstream feed;
//! [`HttpFeedClient`] is the production implementation.

use async_trait::async_trait;
use thiserror::Error;

pub mod client;
pub mod schema;

pub use client::HttpFeedClient;
pub use schema::{FeedRecord, FeedSide, FeedVideo, parse_payload};

/// Failures fetching or decoding the feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed answered with a non-success status
    #[error("feed responded with status {status}")]
    Transport {
        status: u16,
        body_snippet: Option<String>,
    },

    /// No usable response was received
    #[error("feed request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The body does not match the expected payload shape
    #[error("feed payload is invalid: {0}")]
    SchemaValidation(String),

    #[error("feed client misconfigured: {0}")]
    Configuration(String),
}

/// A source of raw highlight records.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Provider tag stored on ingested videos, e.g. `scorebat`.
    fn provider(&self) -> &str;

    /// Fetch and validate the whole feed. Either every record parses or the
    /// call fails.
    async fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError>;
}
