//! VTuber agency roster collector
//!
//! Gathers talent channel rosters from official agency sites, a generated
//! data endpoint and the Virtual YouTuber wiki, resolves every entry to a
//! YouTube channel id, and writes one `{"agencies": [...]}` document.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use application::{AgencyAssembler, CollectorError, CollectorResult};
pub use domain::RosterDocument;
