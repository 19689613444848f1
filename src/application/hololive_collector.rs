//! hololive roster from the official talent directory pages
//!
//! The main index lists every talent profile; each profile carries a unit
//! label that decides the division. The holostars index is walked the same
//! way but every talent there lands in the holostars division.

use tracing::{debug, info};

use super::error::CollectorResult;
use super::pause;
use crate::domain::{Agency, Channel, DivisionBuckets, HololiveDivision, classify_hololive_unit};
use crate::infrastructure::channel_resolver::ChannelResolver;
use crate::infrastructure::config::SourcesConfig;
use crate::infrastructure::fetcher::Fetcher;
use crate::infrastructure::parsing::markers::{hololive_profile_urls, holostars_profile_urls};
use crate::infrastructure::parsing::parse_talent_profile;

pub const AGENCY_NAME: &str = "ホロライブ";
pub const AGENCY_NAME_EN: &str = "hololive";

/// Collects the hololive agency with its own resolver cache
pub struct HololiveCollector<'a> {
    fetcher: &'a dyn Fetcher,
    sources: &'a SourcesConfig,
    resolver: ChannelResolver,
    buckets: DivisionBuckets<HololiveDivision>,
}

impl<'a> HololiveCollector<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sources: &'a SourcesConfig) -> Self {
        Self {
            fetcher,
            sources,
            resolver: ChannelResolver::new(),
            buckets: DivisionBuckets::new(),
        }
    }

    pub async fn collect(mut self) -> CollectorResult<Agency> {
        info!("🔍 Collecting {} from {}", AGENCY_NAME_EN, self.sources.hololive_talents_url);

        let index = self.fetcher.fetch_text(&self.sources.hololive_talents_url, &[]).await?;
        let profiles = hololive_profile_urls(&index);
        debug!("Found {} hololive profile pages", profiles.len());
        for url in &profiles {
            self.collect_profile(url, None).await?;
        }

        let index = self.fetcher.fetch_text(&self.sources.holostars_talents_url, &[]).await?;
        let profiles = holostars_profile_urls(&index);
        debug!("Found {} holostars profile pages", profiles.len());
        for url in &profiles {
            self.collect_profile(url, Some(HololiveDivision::Holostars)).await?;
        }

        info!(
            "✅ {}: {} channels ({} channel page lookups)",
            AGENCY_NAME_EN,
            self.buckets.len(),
            self.resolver.fetch_count()
        );
        Ok(Agency::with_divisions(
            AGENCY_NAME,
            AGENCY_NAME_EN,
            self.buckets.into_divisions(),
        ))
    }

    /// `fixed` bypasses the unit label lookup
    async fn collect_profile(
        &mut self,
        url: &str,
        fixed: Option<HololiveDivision>,
    ) -> CollectorResult<()> {
        let page = self.fetcher.fetch_text(url, &[]).await?;
        let profile = parse_talent_profile(&page);

        let Some(division) = fixed.or_else(|| classify_hololive_unit(profile.unit.as_deref())) else {
            debug!("Skipping {}: unit {:?} is not listed", url, profile.unit);
            return Ok(());
        };

        let resolution = self
            .resolver
            .resolve(self.fetcher, profile.channel_url.as_deref())
            .await;
        let (channel_id, canonical_url) = resolution.into_parts();

        let (Some(name), Some(channel_id)) = (profile.name, channel_id) else {
            debug!("Skipping {}: missing name or channel id", url);
            return Ok(());
        };
        let channel_url = canonical_url
            .or(profile.channel_url)
            .unwrap_or_else(|| channel_id.canonical_url());

        self.buckets.push(division, Channel::new(name, channel_id, channel_url));
        pause(self.sources.hololive_delay_ms).await;
        Ok(())
    }
}
