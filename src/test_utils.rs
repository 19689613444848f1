//! Test utilities for the roster collector
//!
//! Provides an in-memory [`Fetcher`] so extractors, the resolver and the
//! assembler can be exercised against fixed page snapshots without network.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::infrastructure::fetcher::{FetchError, FetchResult, Fetcher};

/// Key a request is stored and looked up under: the URL with its query
pub fn request_key(url: &str, params: &[(&str, &str)]) -> String {
    let parsed = if params.is_empty() {
        url::Url::parse(url)
    } else {
        url::Url::parse_with_params(url, params)
    };
    parsed.map_or_else(|_| url.to_string(), String::from)
}

/// Serves canned bodies by URL and records every request
///
/// Unknown URLs answer with a 404 status error. No retries are simulated.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a text body
    #[must_use]
    pub fn with_page(mut self, url: &str, params: &[(&str, &str)], body: impl Into<String>) -> Self {
        self.pages.insert(request_key(url, params), body.into());
        self
    }

    /// Registers a JSON body
    #[must_use]
    pub fn with_json(self, url: &str, params: &[(&str, &str)], body: &Value) -> Self {
        self.with_page(url, params, body.to_string())
    }

    /// Every request key, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn total_requests(&self) -> usize {
        self.requests().len()
    }

    pub fn requests_for(&self, url: &str, params: &[(&str, &str)]) -> usize {
        let key = request_key(url, params);
        self.requests().iter().filter(|k| **k == key).count()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<String> {
        let key = request_key(url, params);
        if let Ok(mut log) = self.requests.lock() {
            log.push(key.clone());
        }
        self.pages.get(&key).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
