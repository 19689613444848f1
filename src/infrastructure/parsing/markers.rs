//! Named marker extractors for official-site pages, generated-data pages and
//! YouTube channel pages.
//!
//! Each function recognises one marker pattern, first match wins, and
//! degrades to `None`/empty when the marker is absent.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

use super::text::{collapse_whitespace, decode_entities, normalize_youtube_url, strip_tags};
use crate::domain::ChannelId;
use crate::infrastructure::config::sources;

static HOLOLIVE_PROFILE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://hololive\.hololivepro\.com/(?:en/|id/)?talents/([a-z0-9-]+)/").unwrap()
});
static HOLOSTARS_PROFILE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://holostars\.hololivepro\.com/talent/[a-z0-9-]+/").unwrap());

static OG_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static DEFINITION_TERM: Lazy<Selector> = Lazy::new(|| Selector::parse("dt").unwrap());

static SUBSCRIBE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://www\.youtube\.com/[^"\s>]*sub_confirmation=1"#).unwrap());
static CHANNEL_LINKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"https?://www\.youtube\.com/channel/[^"\s>]+"#,
        r#"https?://www\.youtube\.com/@[^"\s>]+"#,
        r#"https?://www\.youtube\.com/c/[^"\s>]+"#,
        r#"https?://www\.youtube\.com/user/[^"\s>]+"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static BUILD_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r#""buildId"\s*:\s*"([^"]+)""#).unwrap());

static CHANNEL_ID_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""channelId":"(UC[\w-]+)""#,
        r#"itemprop="channelId" content="(UC[\w-]+)""#,
        r#""externalId":"(UC[\w-]+)""#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Labels of the unit entry on a profile page, in lookup order
pub const UNIT_LABELS: &[&str] = &["ユニット", "Unit"];

/// Separator between the talent name and the site name in og:title
pub const TITLE_SEPARATOR: &str = " | ";

/// Distinct hololive profile URLs, locale prefixes collapsed, sorted
#[must_use]
pub fn hololive_profile_urls(html: &str) -> Vec<String> {
    HOLOLIVE_PROFILE_LINK
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|slug| sources::hololive_profile_url(slug.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct holostars profile URLs, sorted
#[must_use]
pub fn holostars_profile_urls(html: &str) -> Vec<String> {
    HOLOSTARS_PROFILE_LINK
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fields read from one official profile page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalentProfile {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub channel_url: Option<String>,
}

/// Parses a profile page once and reads every profile marker from it
#[must_use]
pub fn parse_talent_profile(html: &str) -> TalentProfile {
    let document = Html::parse_document(html);
    TalentProfile {
        name: og_title_name(&document),
        unit: unit_label(&document),
        channel_url: primary_channel_url(html),
    }
}

/// Talent name: og:title text before the site-name separator
#[must_use]
pub fn og_title_name(document: &Html) -> Option<String> {
    let title = document
        .select(&OG_TITLE)
        .next()?
        .value()
        .attr("content")?;
    let name = title
        .split_once(TITLE_SEPARATOR)
        .map_or(title, |(head, _)| head)
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Unit/team label from the `<dt>ユニット</dt><dd>…</dd>` entry, tags stripped
#[must_use]
pub fn unit_label(document: &Html) -> Option<String> {
    UNIT_LABELS
        .iter()
        .find_map(|label| definition_for(document, label))
        .filter(|unit| !unit.is_empty())
}

fn definition_for(document: &Html, label: &str) -> Option<String> {
    document
        .select(&DEFINITION_TERM)
        .filter(|dt| dt.text().collect::<String>().trim() == label)
        .find_map(|dt| {
            dt.next_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .filter(|sibling| sibling.value().name() == "dd")
        })
        .map(|dd| collapse_whitespace(&decode_entities(&strip_tags(&dd.inner_html()))))
}

/// Primary channel link: subscribe-confirmation link first, then
/// `/channel/`, `/@handle`, `/c/`, `/user/` links in that order
#[must_use]
pub fn primary_channel_url(html: &str) -> Option<String> {
    if let Some(m) = SUBSCRIBE_LINK.find(html) {
        return normalize_youtube_url(m.as_str());
    }
    CHANNEL_LINKS
        .iter()
        .find_map(|pattern| pattern.find(html))
        .and_then(|m| normalize_youtube_url(m.as_str()))
}

/// Deployment build identifier embedded in a generated page
#[must_use]
pub fn build_id(html: &str) -> Option<String> {
    BUILD_ID
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Channel id embedded in a YouTube channel page
///
/// Tries the JSON `channelId`, the `itemprop` meta tag, then `externalId`.
/// Candidates that do not validate are ignored.
#[must_use]
pub fn channel_id_in_page(html: &str) -> Option<ChannelId> {
    CHANNEL_ID_MARKERS.iter().find_map(|pattern| {
        pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|m| ChannelId::parse(m.as_str()))
    })
}
