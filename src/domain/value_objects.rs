//! # Domain Value Objects
//!
//! Immutable value types that represent concepts in the roster domain.
//! Value objects are defined by their attributes rather than identity.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static CHANNEL_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UC[0-9A-Za-z_-]{22}$").unwrap());

/// Base of every canonical channel URL
pub const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/channel/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a YouTube channel id (expected UC + 22 characters)")]
pub struct InvalidChannelId(pub String);

/// YouTube channel identifier with strong typing
///
/// Always `UC` followed by exactly 22 URL-safe characters. Anything else is
/// rejected at construction, so a `ChannelId` in hand is always emit-ready.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Validates a raw identifier, returning `None` when it does not match
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        CHANNEL_ID_PATTERN
            .is_match(raw)
            .then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `https://www.youtube.com/channel/<id>`
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("{CHANNEL_URL_PREFIX}{}", self.0)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = InvalidChannelId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(InvalidChannelId(value))
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
