//! Domain module - roster entities and the rules that classify them
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod divisions;
pub mod roster;
pub mod value_objects;

pub use divisions::{
    DivisionBuckets, DivisionKind, HololiveDivision, NijisanjiDivision, classify_hololive_unit,
    classify_nijisanji_affiliation,
};
pub use roster::{Agency, AgencyBody, Channel, Division, RosterDocument};
pub use value_objects::{ChannelId, InvalidChannelId};
