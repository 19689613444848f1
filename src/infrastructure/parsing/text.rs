//! Text normalizers: URL cleanup, tag stripping, entity decoding

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static CHANNEL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"youtube\.com/channel/(UC[\w-]+)").unwrap());

/// Strips trailing `)`, `.` and `,` and drops the query string.
///
/// Returns `None` for empty input.
#[must_use]
pub fn normalize_youtube_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let trimmed = url.trim_end_matches([')', '.', ',']);
    let without_query = trimmed.split_once('?').map_or(trimmed, |(head, _)| head);
    Some(without_query.to_string())
}

/// Raw `UC…` token of a `/channel/` URL, without length validation
#[must_use]
pub fn channel_path_token(url: &str) -> Option<&str> {
    CHANNEL_PATH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Removes markup tags and trims the remainder
#[must_use]
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").trim().to_string()
}

/// Decodes HTML character references (`&amp;`, `&#39;`, …)
#[must_use]
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Collapses runs of whitespace into single spaces
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
