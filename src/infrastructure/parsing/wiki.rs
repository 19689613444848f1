//! Wiki markup extraction: roster sections of a rendered agency page, member
//! page links, and YouTube channel references in raw wikitext.

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use std::collections::BTreeSet;

use super::text::{decode_entities, normalize_youtube_url};
use crate::domain::value_objects::CHANNEL_URL_PREFIX;

static H2_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<h2[^>]*>\s*<span class="mw-headline" id="([^"]+)">([^<]+)</span>.*?</h2>"#)
        .unwrap()
});
static H2_TO_H4_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<h[2-4][^>]*>\s*<span class="mw-headline" id="([^"]+)">([^<]+)</span>.*?</h[2-4]>"#)
        .unwrap()
});
static WIKI_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<a[^>]+href="/wiki/([^"]+)""#).unwrap());

static YOUTUBE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://(?:www\.)?youtube\.com/[^\s\]|}<>"]+"#).unwrap());
static YOUTU_BE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://youtu\.be/[^\s\]|}<>"]+"#).unwrap());
static YOUTUBE_TEMPLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\{\{\s*YouTube\s*\|([^}]+)\}\}").unwrap());

/// Heading words that mark a current-member roster
pub const ROSTER_KEYWORDS: &[&str] = &["members", "member", "talent", "livers", "roster"];
/// Heading words that mark past members
pub const EXCLUDED_KEYWORDS: &[&str] = &["former", "graduated", "alumni", "ex-"];
/// Only the top of a member page is searched for a channel link
pub const WIKITEXT_SCAN_LINES: usize = 200;

const CHANNEL_PATH_TOKENS: &[&str] = &["/channel/", "/@", "/c/", "/user/"];
const NON_CHANNEL_TOKENS: &[&str] = &["watch", "embed", "youtu.be/"];

/// Whether a heading title names a current roster
#[must_use]
pub fn is_roster_heading(title: &str) -> bool {
    let lower = title.to_lowercase();
    ROSTER_KEYWORDS.iter().any(|k| lower.contains(k))
        && !EXCLUDED_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn heading_title(heading: &regex::Captures<'_>) -> String {
    heading
        .get(2)
        .map(|m| decode_entities(m.as_str()).trim().to_string())
        .unwrap_or_default()
}

/// Sections under roster headings at one scan level
fn sections_at_level<'a>(html: &'a str, headings: &Regex) -> Vec<&'a str> {
    let found: Vec<_> = headings.captures_iter(html).collect();
    let mut sections = Vec::new();

    for (i, heading) in found.iter().enumerate() {
        if !is_roster_heading(&heading_title(heading)) {
            continue;
        }
        let Some(whole) = heading.get(0) else { continue };
        let start = whole.end();
        let end = found
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |next: Match<'_>| next.start());
        sections.push(&html[start..end]);
    }
    sections
}

/// Roster sections of a rendered page
///
/// Level-2 headings are tried first; only when none qualifies are levels
/// 2–4 scanned. A section runs to the next heading of the same scan.
#[must_use]
pub fn roster_sections(html: &str) -> Vec<&str> {
    let sections = sections_at_level(html, &H2_HEADING);
    if !sections.is_empty() {
        return sections;
    }
    sections_at_level(html, &H2_TO_H4_HEADING)
}

/// Member page title from a `/wiki/<target>` link target
///
/// `None` for namespace links (`File:`, `Category:`…) and list pages.
#[must_use]
pub fn member_name_from_link(target: &str) -> Option<String> {
    let target = target.split('#').next().unwrap_or_default();
    let decoded = decode_entities(target);
    let decoded = urlencoding::decode(&decoded).map_or_else(|_| decoded.clone(), |cow| cow.into_owned());
    let name = decoded.replace('_', " ").trim().to_string();

    if name.is_empty() || name.contains(':') || name.starts_with("List of") {
        return None;
    }
    Some(name)
}

/// Sorted, distinct member names linked from the roster sections
#[must_use]
pub fn member_names(html: &str) -> Vec<String> {
    let sections = roster_sections(html);
    if sections.is_empty() {
        return Vec::new();
    }
    let combined = sections.join("\n");

    WIKI_LINK
        .captures_iter(&combined)
        .filter_map(|caps| caps.get(1))
        .filter_map(|target| member_name_from_link(target.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Channel URL referenced near the top of a member's wikitext
///
/// Plain channel/handle/custom/user links win; otherwise the first
/// `{{YouTube|…}}` template is read for `channel=`, `id=` or a bare `UC…`.
#[must_use]
pub fn youtube_reference(wikitext: &str) -> Option<String> {
    let head = wikitext
        .lines()
        .take(WIKITEXT_SCAN_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let plain_link = YOUTUBE_URL
        .find_iter(&head)
        .chain(YOUTU_BE_URL.find_iter(&head))
        .map(|m| m.as_str())
        .filter(|url| !NON_CHANNEL_TOKENS.iter().any(|t| url.contains(t)))
        .find(|url| CHANNEL_PATH_TOKENS.iter().any(|t| url.contains(t)));
    if let Some(url) = plain_link {
        return normalize_youtube_url(url);
    }

    template_channel_url(&head)
}

fn template_channel_url(head: &str) -> Option<String> {
    let params = YOUTUBE_TEMPLATE.captures(head)?.get(1)?.as_str();
    params.split('|').map(str::trim).find_map(|param| {
        let id = param
            .strip_prefix("channel=")
            .or_else(|| param.strip_prefix("id="))
            .map_or(param, str::trim);
        id.starts_with("UC")
            .then(|| format!("{CHANNEL_URL_PREFIX}{id}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, title: &str) -> String {
        let id = title.replace(' ', "_");
        format!(
            r#"<h{level}><span class="mw-headline" id="{id}">{title}</span><span class="mw-editsection">[edit]</span></h{level}>"#
        )
    }

    #[test]
    fn former_members_section_is_ignored() {
        let html = format!(
            r#"<p>intro <a href="/wiki/VSPO!">VSPO!</a></p>{}<ul><li><a href="/wiki/Kaga_Nazuna" title="Kaga Nazuna">Kaga Nazuna</a></li><li><a href="/wiki/Hanabusa_Lisa">Lisa</a></li></ul>{}<ul><li><a href="/wiki/Former_Talent">Former</a></li></ul>"#,
            heading(2, "Members"),
            heading(2, "Former Members")
        );
        assert_eq!(member_names(&html), vec!["Hanabusa Lisa", "Kaga Nazuna"]);
    }

    #[test]
    fn falls_back_to_lower_headings() {
        let html = format!(
            r#"{}<p>About</p>{}<a href="/wiki/Aoi_Tsubasa">a</a>{}<a href="/wiki/Someone_Else">b</a>"#,
            heading(2, "Overview"),
            heading(3, "Current Talents"),
            heading(3, "Staff")
        );
        assert_eq!(member_names(&html), vec!["Aoi Tsubasa"]);
    }

    #[test]
    fn no_roster_heading_yields_nothing() {
        let html = format!(r#"{}<a href="/wiki/Someone">x</a>"#, heading(2, "History"));
        assert!(roster_sections(&html).is_empty());
        assert!(member_names(&html).is_empty());
    }

    #[test]
    fn link_targets_are_filtered_and_cleaned() {
        assert_eq!(member_name_from_link("Shinomiya_Runa#Profile").as_deref(), Some("Shinomiya Runa"));
        assert_eq!(member_name_from_link("Kamito").as_deref(), Some("Kamito"));
        assert_eq!(member_name_from_link("Ch%C3%BCrosu").as_deref(), Some("Chürosu"));
        assert_eq!(member_name_from_link("Tom_&amp;_Jerry").as_deref(), Some("Tom & Jerry"));
        assert!(member_name_from_link("File:Logo.png").is_none());
        assert!(member_name_from_link("List_of_VTubers").is_none());
        assert!(member_name_from_link("#top").is_none());
    }

    #[test]
    fn heading_keywords() {
        assert!(is_roster_heading("Members"));
        assert!(is_roster_heading("Current Livers"));
        assert!(is_roster_heading("Talent Roster"));
        assert!(!is_roster_heading("Former Members"));
        assert!(!is_roster_heading("Graduated talents"));
        assert!(!is_roster_heading("Ex-Members"));
        assert!(!is_roster_heading("History"));
    }

    #[test]
    fn plain_channel_link_wins_over_template() {
        let text = "{{Infobox\n|channel = [https://www.youtube.com/watch?v=abc stream]\n|youtube = https://www.youtube.com/@kaminariqpi.\n}}\n{{YouTube|channel=UCp6993wxpyDPHUpavwDFqgg}}";
        assert_eq!(
            youtube_reference(text).as_deref(),
            Some("https://www.youtube.com/@kaminariqpi")
        );
    }

    #[test]
    fn youtube_template_channel_parameter() {
        let text = "'''Someone''' is a VTuber.\n{{YouTube|channel=UCxyz}}\n";
        assert_eq!(
            youtube_reference(text).as_deref(),
            Some("https://www.youtube.com/channel/UCxyz")
        );
    }

    #[test]
    fn youtube_template_id_and_bare_forms() {
        assert_eq!(
            youtube_reference("{{youtube | id=UCabc | name=x}}").as_deref(),
            Some("https://www.youtube.com/channel/UCabc")
        );
        assert_eq!(
            youtube_reference("{{YouTube|Some name|UCdef}}").as_deref(),
            Some("https://www.youtube.com/channel/UCdef")
        );
        assert!(youtube_reference("{{YouTube|channel=kaminari}}").is_none());
    }

    #[test]
    fn watch_embed_and_short_links_are_skipped() {
        let text = "https://www.youtube.com/watch?v=x/channel/\nhttps://youtu.be/abc/@x\nhttps://www.youtube.com/embed/@y";
        assert!(youtube_reference(text).is_none());
    }

    #[test]
    fn only_first_200_lines_are_scanned() {
        let mut text = "filler\n".repeat(WIKITEXT_SCAN_LINES);
        text.push_str("https://www.youtube.com/channel/UCp6993wxpyDPHUpavwDFqgg\n");
        assert!(youtube_reference(&text).is_none());
    }
}
