//! Application layer: per-source collectors and the assembler that runs
//! them into one roster document.

pub mod assembler;
pub mod error;
pub mod hololive_collector;
pub mod nijisanji_collector;
pub mod wiki_collector;

pub use assembler::AgencyAssembler;
pub use error::{CollectorError, CollectorResult};
pub use hololive_collector::HololiveCollector;
pub use nijisanji_collector::NijisanjiCollector;
pub use wiki_collector::{WikiCollector, WikiPass};

use std::time::Duration;

/// Politeness delay after a recorded talent; zero skips the timer
pub(crate) async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
