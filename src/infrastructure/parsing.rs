//! Markup extraction for roster sources
//!
//! Heuristic, marker-based extraction from semi-structured pages. Every
//! marker lives behind its own named function so a source can be updated
//! without touching the others.

pub mod markers;
pub mod text;
pub mod wiki;

pub use markers::{TalentProfile, parse_talent_profile};
pub use text::{channel_path_token, decode_entities, normalize_youtube_url, strip_tags};
