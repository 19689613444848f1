//! Collects every agency roster and writes the combined JSON document

use anyhow::{Context, Result};
use tracing::{error, info};

use vtuber_roster_lib::AgencyAssembler;
use vtuber_roster_lib::infrastructure::{AppConfig, HttpClient, init_logging_with_config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    // held for the whole run so buffered file logs are flushed on exit
    let _log_guard = init_logging_with_config(&config.logging)?;

    info!("🚀 Starting roster collection");
    let client = HttpClient::with_config(&config.http).context("Failed to build HTTP client")?;
    let assembler = AgencyAssembler::new(&client, &config.sources);

    match assembler.run(&config.output.path).await {
        Ok(document) => {
            info!(
                "🎉 Roster collection finished: {} agencies, {} channels",
                document.agencies.len(),
                document.channel_count()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Roster collection failed: {}", e);
            Err(e).context("Roster collection failed")
        }
    }
}
