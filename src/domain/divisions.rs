//! Closed division enumerations and the classifiers that map free-text
//! labels from source pages onto them.

use super::roster::{Channel, Division};

/// A fixed, ordered set of divisions belonging to one agency
pub trait DivisionKind: Copy + Eq + 'static {
    /// Every division, in output order
    const ALL: &'static [Self];

    /// Native-language display name
    fn display_name(self) -> &'static str;

    /// Stable slug, unique within the agency
    fn slug(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HololiveDivision {
    Jp,
    En,
    Id,
    Holostars,
}

impl DivisionKind for HololiveDivision {
    const ALL: &'static [Self] = &[Self::Jp, Self::En, Self::Id, Self::Holostars];

    fn display_name(self) -> &'static str {
        match self {
            Self::Jp => "ホロライブJP",
            Self::En => "ホロライブEN",
            Self::Id => "ホロライブID",
            Self::Holostars => "ホロスターズ",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Jp => "hololive-jp",
            Self::En => "hololive-en",
            Self::Id => "hololive-id",
            Self::Holostars => "holostars",
        }
    }
}

const HOLOSTARS_TOKENS: &[&str] = &["holostars", "uproar", "tempus", "armis"];
const ENGLISH_TOKENS: &[&str] = &[
    "hololive english",
    "myth",
    "promise",
    "council",
    "advent",
    "justice",
    "project: hope",
    "english",
];
const INDONESIA_TOKENS: &[&str] = &["hololive indonesia", "indonesia", "area 15", "holoro"];

/// Maps a profile-page unit label onto a hololive division.
///
/// Latin tokens match case-insensitively, native-script tokens as exact
/// substrings. `None` means the talent is not listed: no label, staff units,
/// and the holoan mascot group.
#[must_use]
pub fn classify_hololive_unit(unit: Option<&str>) -> Option<HololiveDivision> {
    let unit = unit?;
    let lower = unit.to_lowercase();
    let has_any = |tokens: &[&str]| tokens.iter().any(|token| lower.contains(token));

    if unit.contains("スタッフ") || lower.contains("holoan") {
        return None;
    }
    if has_any(HOLOSTARS_TOKENS) || unit.contains("ホロスターズ") {
        return Some(HololiveDivision::Holostars);
    }
    if has_any(ENGLISH_TOKENS) {
        return Some(HololiveDivision::En);
    }
    if has_any(INDONESIA_TOKENS) || unit.contains("インドネシア") {
        return Some(HololiveDivision::Id);
    }
    Some(HololiveDivision::Jp)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NijisanjiDivision {
    Jp,
    En,
    Id,
    Kr,
    VirtuaReal,
}

impl DivisionKind for NijisanjiDivision {
    const ALL: &'static [Self] = &[Self::Jp, Self::En, Self::Id, Self::Kr, Self::VirtuaReal];

    fn display_name(self) -> &'static str {
        match self {
            Self::Jp => "にじさんじJP",
            Self::En => "にじさんじEN",
            Self::Id => "にじさんじID",
            Self::Kr => "にじさんじKR",
            Self::VirtuaReal => "VirtuaReal",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Jp => "nijisanji-jp",
            Self::En => "nijisanji-en",
            Self::Id => "nijisanji-id",
            Self::Kr => "nijisanji-kr",
            Self::VirtuaReal => "virtua-real",
        }
    }
}

/// Maps a talent's affiliation value onto a nijisanji division.
///
/// Exact match on three known values; everything else (including no value)
/// lands in the JP division.
#[must_use]
pub fn classify_nijisanji_affiliation(affiliation: Option<&str>) -> NijisanjiDivision {
    match affiliation {
        Some("NIJISANJI EN") => NijisanjiDivision::En,
        Some("NIJISANJI ID") => NijisanjiDivision::Id,
        Some("VirtuaReal") => NijisanjiDivision::VirtuaReal,
        _ => NijisanjiDivision::Jp,
    }
}

/// Per-division channel lists, emitted in the kind's declaration order
#[derive(Debug)]
pub struct DivisionBuckets<D: DivisionKind> {
    buckets: Vec<(D, Vec<Channel>)>,
}

impl<D: DivisionKind> DivisionBuckets<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: D::ALL.iter().map(|&kind| (kind, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, division: D, channel: Channel) {
        if let Some((_, channels)) = self.buckets.iter_mut().find(|(kind, _)| *kind == division) {
            channels.push(channel);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, channels)| channels.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_divisions(self) -> Vec<Division> {
        self.buckets
            .into_iter()
            .map(|(kind, channels)| Division {
                name: kind.display_name().to_string(),
                name_en: kind.slug().to_string(),
                channels,
            })
            .collect()
    }
}

impl<D: DivisionKind> Default for DivisionBuckets<D> {
    fn default() -> Self {
        Self::new()
    }
}
