//! Agencies without a machine-readable official roster, read from the
//! Virtual YouTuber wiki through the MediaWiki parse API.
//!
//! Every wiki agency in one pass shares a resolver cache and a seen-id set,
//! so a talent listed under two agencies is recorded only for the first.

use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

use super::error::CollectorResult;
use super::pause;
use crate::domain::{Agency, Channel, ChannelId};
use crate::infrastructure::channel_resolver::ChannelResolver;
use crate::infrastructure::config::SourcesConfig;
use crate::infrastructure::config::sources::{WIKI_AGENCIES, WikiAgency};
use crate::infrastructure::fetcher::Fetcher;
use crate::infrastructure::parsing::wiki::{member_names, youtube_reference};

/// Shared state of one wiki collection pass
#[derive(Debug, Default)]
pub struct WikiPass {
    pub resolver: ChannelResolver,
    pub seen: HashSet<ChannelId>,
}

pub struct WikiCollector<'a> {
    fetcher: &'a dyn Fetcher,
    sources: &'a SourcesConfig,
    api_url: String,
}

impl<'a> WikiCollector<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sources: &'a SourcesConfig) -> Self {
        Self {
            fetcher,
            sources,
            api_url: sources.wiki_api_url(),
        }
    }

    /// Reads `parse.<prop>.*` for a page; empty when absent
    async fn parsed(&self, page: &str, prop: &str) -> CollectorResult<String> {
        let params = [
            ("action", "parse"),
            ("page", page),
            ("prop", prop),
            ("format", "json"),
        ];
        let document = self.fetcher.fetch_json(&self.api_url, &params).await?;
        Ok(document
            .get("parse")
            .and_then(|parse| parse.get(prop))
            .and_then(|body| body.get("*"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Collects every catalogue agency in order with one shared pass
    pub async fn collect_all(&self) -> CollectorResult<Vec<Agency>> {
        let mut pass = WikiPass::default();
        let mut agencies = Vec::with_capacity(WIKI_AGENCIES.len());
        for agency in WIKI_AGENCIES {
            agencies.push(self.collect(agency, &mut pass).await?);
        }
        debug!(
            "Wiki pass done: {} distinct channels, {} channel page lookups",
            pass.seen.len(),
            pass.resolver.fetch_count()
        );
        Ok(agencies)
    }

    pub async fn collect(&self, agency: &WikiAgency, pass: &mut WikiPass) -> CollectorResult<Agency> {
        info!("🔍 Collecting {} from wiki page {:?}", agency.name_en, agency.wiki_page);

        let html = self.parsed(agency.wiki_page, "text").await?;
        if html.is_empty() {
            debug!("Wiki page {:?} has no rendered text", agency.wiki_page);
            return Ok(Agency::with_channels(agency.name, agency.name_en, Vec::new()));
        }

        let members = member_names(&html);
        debug!("{}: {} member links", agency.name_en, members.len());

        let mut channels = Vec::new();
        for member in members {
            let wikitext = self.parsed(&member, "wikitext").await?;
            if wikitext.is_empty() {
                debug!("Skipping {}: no wikitext", member);
                continue;
            }
            let Some(reference) = youtube_reference(&wikitext) else {
                debug!("Skipping {}: no YouTube reference", member);
                continue;
            };

            let (channel_id, canonical_url) = pass
                .resolver
                .resolve(self.fetcher, Some(reference.as_str()))
                .await
                .into_parts();
            let Some(channel_id) = channel_id else {
                debug!("Skipping {}: {} did not resolve", member, reference);
                continue;
            };
            if pass.seen.contains(&channel_id) {
                debug!("Skipping {}: {} already recorded", member, channel_id);
                continue;
            }

            pass.seen.insert(channel_id.clone());
            let channel_url = canonical_url.unwrap_or(reference);
            channels.push(Channel::new(member, channel_id, channel_url));
            pause(self.sources.wiki_delay_ms).await;
        }

        info!("✅ {}: {} channels", agency.name_en, channels.len());
        Ok(Agency::with_channels(agency.name, agency.name_en, channels))
    }
}
