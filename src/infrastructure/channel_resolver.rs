//! Channel identity resolution
//!
//! Turns any channel reference (canonical `/channel/` URL, `@handle`, legacy
//! `/c/` or `/user/` URL) into a validated [`ChannelId`] plus canonical URL.
//! Non-canonical URLs cost one page fetch each; outcomes, including misses,
//! are cached per resolver instance.

use std::collections::HashMap;
use tracing::debug;

use super::fetcher::Fetcher;
use super::parsing::markers::channel_id_in_page;
use super::parsing::text::{channel_path_token, normalize_youtube_url};
use crate::domain::ChannelId;

/// Outcome of resolving one channel reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        channel_id: ChannelId,
        canonical_url: String,
    },
    /// No id found; carries the URL that was tried, if any
    Unresolved { original_url: Option<String> },
}

impl Resolution {
    fn resolved(channel_id: ChannelId) -> Self {
        let canonical_url = channel_id.canonical_url();
        Self::Resolved {
            channel_id,
            canonical_url,
        }
    }

    #[must_use]
    pub fn channel_id(&self) -> Option<&ChannelId> {
        match self {
            Self::Resolved { channel_id, .. } => Some(channel_id),
            Self::Unresolved { .. } => None,
        }
    }

    /// `(channel_id, url)`: canonical URL when resolved, the tried URL otherwise
    #[must_use]
    pub fn into_parts(self) -> (Option<ChannelId>, Option<String>) {
        match self {
            Self::Resolved {
                channel_id,
                canonical_url,
            } => (Some(channel_id), Some(canonical_url)),
            Self::Unresolved { original_url } => (None, original_url),
        }
    }
}

/// Memoizing resolver; one instance per collection pass
#[derive(Debug, Default)]
pub struct ChannelResolver {
    cache: HashMap<String, Option<ChannelId>>,
    fetches: usize,
}

impl ChannelResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page fetches performed so far
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Distinct non-canonical URLs seen so far
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolves a raw channel reference. Never fails; a miss is `Unresolved`.
    pub async fn resolve(&mut self, fetcher: &dyn Fetcher, raw_url: Option<&str>) -> Resolution {
        let Some(url) = raw_url.and_then(normalize_youtube_url) else {
            return Resolution::Unresolved { original_url: None };
        };

        if let Some(token) = channel_path_token(&url) {
            return match ChannelId::parse(token) {
                Some(channel_id) => Resolution::resolved(channel_id),
                None => {
                    debug!("Malformed channel id in {}", url);
                    Resolution::Unresolved {
                        original_url: Some(url),
                    }
                }
            };
        }

        if let Some(cached) = self.cache.get(&url) {
            debug!("Resolution cache hit: {}", url);
            return match cached {
                Some(channel_id) => Resolution::resolved(channel_id.clone()),
                None => Resolution::Unresolved { original_url: None },
            };
        }

        self.fetches += 1;
        let channel_id = match fetcher.fetch_text(&url, &[]).await {
            Ok(html) => channel_id_in_page(&html),
            Err(e) => {
                debug!("Channel page unavailable: {} - {}", url, e);
                self.cache.insert(url.clone(), None);
                return Resolution::Unresolved {
                    original_url: Some(url),
                };
            }
        };

        self.cache.insert(url.clone(), channel_id.clone());
        match channel_id {
            Some(channel_id) => {
                debug!("Resolved {} -> {}", url, channel_id);
                Resolution::resolved(channel_id)
            }
            None => {
                debug!("No channel id marker in {}", url);
                Resolution::Unresolved {
                    original_url: Some(url),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticFetcher;

    const SORA: &str = "UCp6993wxpyDPHUpavwDFqgg";

    fn channel_page(id: &str) -> String {
        format!(r#"<html><script>var ytInitialData = {{"metadata":{{"channelId":"{id}"}}}};</script></html>"#)
    }

    #[tokio::test]
    async fn canonical_url_resolves_without_fetch() {
        let fetcher = StaticFetcher::new();
        let mut resolver = ChannelResolver::new();

        let raw = format!("https://www.youtube.com/channel/{SORA}?sub_confirmation=1");
        let resolution = resolver.resolve(&fetcher, Some(&raw)).await;

        assert_eq!(resolution.channel_id().unwrap().as_str(), SORA);
        assert_eq!(
            resolution.into_parts().1.as_deref(),
            Some("https://www.youtube.com/channel/UCp6993wxpyDPHUpavwDFqgg")
        );
        assert_eq!(fetcher.total_requests(), 0);
        assert_eq!(resolver.fetch_count(), 0);
    }

    #[tokio::test]
    async fn malformed_channel_url_is_not_fetched() {
        let fetcher = StaticFetcher::new();
        let mut resolver = ChannelResolver::new();

        let resolution = resolver
            .resolve(&fetcher, Some("https://www.youtube.com/channel/UCabc123?sub_confirmation=1"))
            .await;

        assert_eq!(
            resolution,
            Resolution::Unresolved {
                original_url: Some("https://www.youtube.com/channel/UCabc123".to_string())
            }
        );
        assert_eq!(fetcher.total_requests(), 0);
    }

    #[tokio::test]
    async fn empty_input_is_unresolved() {
        let fetcher = StaticFetcher::new();
        let mut resolver = ChannelResolver::new();
        assert_eq!(
            resolver.resolve(&fetcher, None).await.into_parts(),
            (None, None)
        );
        assert_eq!(
            resolver.resolve(&fetcher, Some("")).await.into_parts(),
            (None, None)
        );
        assert_eq!(fetcher.total_requests(), 0);
    }

    #[tokio::test]
    async fn handle_url_is_fetched_once_and_memoized() {
        let handle = "https://www.youtube.com/@tokinosora";
        let fetcher = StaticFetcher::new().with_page(handle, &[], channel_page(SORA));
        let mut resolver = ChannelResolver::new();

        let first = resolver.resolve(&fetcher, Some(handle)).await;
        let second = resolver.resolve(&fetcher, Some("https://www.youtube.com/@tokinosora?si=x")).await;

        assert_eq!(first, second);
        assert_eq!(first.channel_id().unwrap().as_str(), SORA);
        assert_eq!(fetcher.requests_for(handle, &[]), 1);
        assert_eq!(resolver.fetch_count(), 1);
        assert_eq!(resolver.cache_len(), 1);
    }

    #[tokio::test]
    async fn dead_url_is_negatively_cached() {
        let fetcher = StaticFetcher::new();
        let mut resolver = ChannelResolver::new();
        let dead = "https://www.youtube.com/c/gone";

        let first = resolver.resolve(&fetcher, Some(dead)).await;
        assert_eq!(
            first,
            Resolution::Unresolved {
                original_url: Some(dead.to_string())
            }
        );

        let second = resolver.resolve(&fetcher, Some(dead)).await;
        assert_eq!(second.into_parts(), (None, None));
        assert_eq!(fetcher.total_requests(), 1);
    }

    #[tokio::test]
    async fn page_without_marker_is_cached_as_miss() {
        let user = "https://www.youtube.com/user/someone";
        let fetcher = StaticFetcher::new().with_page(user, &[], "<html>consent wall</html>");
        let mut resolver = ChannelResolver::new();

        assert!(resolver.resolve(&fetcher, Some(user)).await.channel_id().is_none());
        assert!(resolver.resolve(&fetcher, Some(user)).await.channel_id().is_none());
        assert_eq!(fetcher.total_requests(), 1);
    }

    #[tokio::test]
    async fn separate_resolvers_do_not_share_cache() {
        let handle = "https://www.youtube.com/@tokinosora";
        let fetcher = StaticFetcher::new().with_page(handle, &[], channel_page(SORA));

        let mut first = ChannelResolver::new();
        let mut second = ChannelResolver::new();
        first.resolve(&fetcher, Some(handle)).await;
        second.resolve(&fetcher, Some(handle)).await;

        assert_eq!(fetcher.requests_for(handle, &[]), 2);
    }
}
