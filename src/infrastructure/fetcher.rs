//! Fetch capability used by every extractor
//!
//! Extractors and the channel resolver only see this trait, so a run can be
//! driven by the real [`HttpClient`](super::http_client::HttpClient) or by an
//! in-memory page set.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP request failed: {url} - {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed with status {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// URL the failing request was addressed to, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::ClientBuild(_) => None,
            Self::Request { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::RetriesExhausted { url, .. } => Some(url),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// GET-with-retry capability
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` with the given query parameters and returns the body
    async fn fetch_text(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<String>;

    /// Fetches `url` and decodes the body as JSON
    async fn fetch_json(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
        let body = self.fetch_text(url, params).await?;
        decode_json(url, &body)
    }
}

/// Decodes a response body fetched from `url`
pub fn decode_json(url: &str, body: &str) -> FetchResult<Value> {
    serde_json::from_str(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
