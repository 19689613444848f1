//! Uploads prepared talent record files to the roster API
//!
//! Each configured input file must hold a JSON array; it is posted as one
//! bulk import request. The process exits non-zero if any file fails.

use anyhow::{Result, bail};
use tracing::{error, info, warn};

use vtuber_roster_lib::infrastructure::{
    AppConfig, BulkUploadClient, init_logging_with_config, load_records,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let _log_guard = init_logging_with_config(&config.logging)?;

    let client = BulkUploadClient::with_config(&config.upload, &config.http.user_agent)?;
    info!("📤 Uploading {} files to {}", config.upload.input_files.len(), client.endpoint());

    let mut failures = 0usize;
    for path in &config.upload.input_files {
        let records = match load_records(path).await {
            Ok(records) => records,
            Err(e) => {
                error!("❌ {}", e);
                failures += 1;
                continue;
            }
        };

        info!("📄 {}: {} records", path.display(), records.len());
        match client.upload(&records).await {
            Ok(report) => {
                info!(
                    "✅ {}: {} ({} total, {} succeeded, {} failed)",
                    path.display(),
                    report.message.as_deref().unwrap_or("done"),
                    report.total.map_or_else(|| records.len().to_string(), |t| t.to_string()),
                    report.succeeded,
                    report.failed
                );
                for item in &report.failed_items {
                    warn!(
                        "  - {}: {}",
                        item.name.as_deref().unwrap_or("<unnamed>"),
                        item.error.as_deref().unwrap_or("<no error message>")
                    );
                }
            }
            Err(e) => {
                error!("❌ {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} uploads failed", config.upload.input_files.len());
    }
    info!("🎉 All uploads finished");
    Ok(())
}
