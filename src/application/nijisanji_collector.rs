//! nijisanji roster from the site's generated page data
//!
//! The talents page embeds a deployment build id; with it the list of livers
//! and each liver's detail document are read as JSON.

use serde_json::Value;
use tracing::{debug, info};

use super::error::{CollectorError, CollectorResult};
use super::pause;
use crate::domain::{
    Agency, Channel, ChannelId, DivisionBuckets, NijisanjiDivision, classify_nijisanji_affiliation,
};
use crate::infrastructure::config::SourcesConfig;
use crate::infrastructure::fetcher::Fetcher;
use crate::infrastructure::parsing::markers::build_id;

pub const AGENCY_NAME: &str = "にじさんじ";
pub const AGENCY_NAME_EN: &str = "nijisanji";

/// Fields read from one liver detail document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiverDetail {
    pub name: Option<String>,
    pub channel_id: Option<String>,
    pub youtube_url: Option<String>,
    pub affiliation: Option<String>,
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl LiverDetail {
    /// Reads `pageProps.liverDetail`; `None` when the document lacks it
    #[must_use]
    pub fn from_document(document: &Value) -> Option<Self> {
        let detail = document.pointer("/pageProps/liverDetail")?;
        if !detail.is_object() {
            return None;
        }

        // affiliation is either a string or a list of strings
        let affiliation = match detail.pointer("/profile/affiliation") {
            Some(Value::Array(items)) => non_empty_str(items.first()),
            other => non_empty_str(other),
        };

        Some(Self {
            name: non_empty_str(detail.get("name")),
            channel_id: non_empty_str(detail.get("channelId")),
            youtube_url: non_empty_str(detail.pointer("/socialLinks/youtube")),
            affiliation,
        })
    }
}

/// Collects the nijisanji agency
pub struct NijisanjiCollector<'a> {
    fetcher: &'a dyn Fetcher,
    sources: &'a SourcesConfig,
}

impl<'a> NijisanjiCollector<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sources: &'a SourcesConfig) -> Self {
        Self { fetcher, sources }
    }

    fn base_url(&self) -> &str {
        self.sources.nijisanji_base_url.trim_end_matches('/')
    }

    fn data_url(&self, build_id: &str, path: &str) -> String {
        format!(
            "{}/_next/data/{}/{}/{}",
            self.base_url(),
            build_id,
            self.sources.nijisanji_locale,
            path
        )
    }

    pub async fn collect(self) -> CollectorResult<Agency> {
        let talents_url = format!("{}/talents", self.base_url());
        info!("🔍 Collecting {} from {}", AGENCY_NAME_EN, talents_url);

        let html = self.fetcher.fetch_text(&talents_url, &[]).await?;
        let build_id = build_id(&html).ok_or(CollectorError::MissingBuildId { url: talents_url })?;
        debug!("nijisanji build id: {}", build_id);

        let list_url = self.data_url(&build_id, "talents.json");
        let list = self.fetcher.fetch_json(&list_url, &[]).await?;
        let livers = list
            .pointer("/pageProps/allLivers")
            .and_then(Value::as_array)
            .ok_or(CollectorError::UnexpectedShape {
                url: list_url,
                path: "pageProps.allLivers",
            })?;
        debug!("Found {} livers", livers.len());

        let mut buckets = DivisionBuckets::<NijisanjiDivision>::new();
        for liver in livers {
            let Some(slug) = non_empty_str(liver.get("slug")) else {
                continue;
            };
            let detail_url = self.data_url(&build_id, &format!("talents/l/{slug}.json"));
            let document = self.fetcher.fetch_json(&detail_url, &[]).await?;

            let Some(detail) = LiverDetail::from_document(&document) else {
                debug!("Skipping {}: no liverDetail", slug);
                continue;
            };
            let Some((division, channel)) = channel_for(detail, non_empty_str(liver.get("name"))) else {
                debug!("Skipping {}: missing name, channel id or channel url", slug);
                continue;
            };

            buckets.push(division, channel);
            pause(self.sources.nijisanji_delay_ms).await;
        }

        info!("✅ {}: {} channels", AGENCY_NAME_EN, buckets.len());
        Ok(Agency::with_divisions(
            AGENCY_NAME,
            AGENCY_NAME_EN,
            buckets.into_divisions(),
        ))
    }
}

/// Builds the channel record; the list entry's name is the fallback
fn channel_for(detail: LiverDetail, list_name: Option<String>) -> Option<(NijisanjiDivision, Channel)> {
    let division = classify_nijisanji_affiliation(detail.affiliation.as_deref());
    let name = detail.name.or(list_name)?;
    let channel_id = ChannelId::parse(detail.channel_id.as_deref()?)?;
    let channel_url = detail
        .youtube_url
        .unwrap_or_else(|| channel_id.canonical_url());
    Some((division, Channel::new(name, channel_id, channel_url)))
}
