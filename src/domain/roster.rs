//! Roster entities: agency → division → channel
//!
//! These are the records serialized into the output document. They are built
//! once during assembly and never mutated afterwards.

use serde::{Deserialize, Serialize};

use super::value_objects::ChannelId;

/// Top-level output document: `{"agencies": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDocument {
    pub agencies: Vec<Agency>,
}

impl RosterDocument {
    /// Total channels across every agency
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.agencies.iter().map(Agency::channel_count).sum()
    }
}

/// A talent agency
///
/// The body is flattened so the JSON carries either a `divisions` or a
/// `channels` key next to the names, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub name: String,
    pub name_en: String,
    #[serde(flatten)]
    pub body: AgencyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgencyBody {
    Divisions { divisions: Vec<Division> },
    Channels { channels: Vec<Channel> },
}

impl Agency {
    pub fn with_divisions(
        name: impl Into<String>,
        name_en: impl Into<String>,
        divisions: Vec<Division>,
    ) -> Self {
        Self {
            name: name.into(),
            name_en: name_en.into(),
            body: AgencyBody::Divisions { divisions },
        }
    }

    pub fn with_channels(
        name: impl Into<String>,
        name_en: impl Into<String>,
        channels: Vec<Channel>,
    ) -> Self {
        Self {
            name: name.into(),
            name_en: name_en.into(),
            body: AgencyBody::Channels { channels },
        }
    }

    /// Iterates every channel regardless of the body shape
    pub fn channels(&self) -> Box<dyn Iterator<Item = &Channel> + '_> {
        match &self.body {
            AgencyBody::Divisions { divisions } => {
                Box::new(divisions.iter().flat_map(|d| d.channels.iter()))
            }
            AgencyBody::Channels { channels } => Box::new(channels.iter()),
        }
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels().count()
    }

    /// Looks up a division by slug (only for divided agencies)
    #[must_use]
    pub fn division(&self, name_en: &str) -> Option<&Division> {
        match &self.body {
            AgencyBody::Divisions { divisions } => divisions.iter().find(|d| d.name_en == name_en),
            AgencyBody::Channels { .. } => None,
        }
    }
}

/// Sub-brand or regional grouping within an agency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    pub name_en: String,
    pub channels: Vec<Channel>,
}

/// One talent's channel record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub channel_id: ChannelId,
    pub channel_url: String,
}

impl Channel {
    pub fn new(name: impl Into<String>, channel_id: ChannelId, channel_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel_id,
            channel_url: channel_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_channel() -> Channel {
        let id = ChannelId::parse("UCp6993wxpyDPHUpavwDFqgg").unwrap();
        let url = id.canonical_url();
        Channel::new("ときのそら", id, url)
    }

    #[test]
    fn divided_agency_serializes_divisions_only() {
        let agency = Agency::with_divisions(
            "ホロライブ",
            "hololive",
            vec![Division {
                name: "ホロライブJP".into(),
                name_en: "hololive-jp".into(),
                channels: vec![sample_channel()],
            }],
        );
        let value = serde_json::to_value(&agency).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "ホロライブ",
                "name_en": "hololive",
                "divisions": [{
                    "name": "ホロライブJP",
                    "name_en": "hololive-jp",
                    "channels": [{
                        "name": "ときのそら",
                        "channel_id": "UCp6993wxpyDPHUpavwDFqgg",
                        "channel_url": "https://www.youtube.com/channel/UCp6993wxpyDPHUpavwDFqgg"
                    }]
                }]
            })
        );
        assert!(value.get("channels").is_none());
    }

    #[test]
    fn flat_agency_serializes_channels_only() {
        let agency = Agency::with_channels("VShojo", "vshojo", vec![sample_channel()]);
        let value = serde_json::to_value(&agency).unwrap();
        assert!(value.get("divisions").is_none());
        assert_eq!(value["channels"].as_array().unwrap().len(), 1);
        assert_eq!(agency.channel_count(), 1);
        assert!(agency.division("anything").is_none());
    }

    #[test]
    fn document_reads_back_both_shapes() {
        let doc = RosterDocument {
            agencies: vec![
                Agency::with_channels("VShojo", "vshojo", vec![sample_channel()]),
                Agency::with_divisions("にじさんじ", "nijisanji", vec![]),
            ],
        };
        let text = serde_json::to_string(&doc).unwrap();
        let back: RosterDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.channel_count(), 1);
    }
}
