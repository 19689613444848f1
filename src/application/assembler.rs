//! Runs every source in a fixed order and writes the combined document

use std::path::Path;
use tracing::{info, warn};

use super::error::CollectorResult;
use super::hololive_collector::HololiveCollector;
use super::nijisanji_collector::NijisanjiCollector;
use super::wiki_collector::WikiCollector;
use crate::domain::RosterDocument;
use crate::infrastructure::config::SourcesConfig;
use crate::infrastructure::fetcher::Fetcher;
use crate::infrastructure::roster_store::write_roster;

/// Output order: hololive, nijisanji, then the wiki catalogue
pub struct AgencyAssembler<'a> {
    fetcher: &'a dyn Fetcher,
    sources: &'a SourcesConfig,
}

impl<'a> AgencyAssembler<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sources: &'a SourcesConfig) -> Self {
        Self { fetcher, sources }
    }

    /// Collects every agency; any exhausted fetch aborts the whole pass
    pub async fn assemble(&self) -> CollectorResult<RosterDocument> {
        let mut agencies = Vec::new();
        agencies.push(HololiveCollector::new(self.fetcher, self.sources).collect().await?);
        agencies.push(NijisanjiCollector::new(self.fetcher, self.sources).collect().await?);
        agencies.extend(WikiCollector::new(self.fetcher, self.sources).collect_all().await?);

        let document = RosterDocument { agencies };
        for agency in &document.agencies {
            let count = agency.channel_count();
            if count == 0 {
                // an empty source is not an error; markers may have gone stale
                warn!("⚠️ {}: no channels collected", agency.name_en);
            } else {
                info!("📊 {}: {} channels", agency.name_en, count);
            }
        }
        info!(
            "📊 Total: {} agencies, {} channels",
            document.agencies.len(),
            document.channel_count()
        );
        Ok(document)
    }

    /// Assembles and writes the document to `output`
    pub async fn run(&self, output: &Path) -> CollectorResult<RosterDocument> {
        let document = self.assemble().await?;
        write_roster(output, &document).await?;
        Ok(document)
    }
}
