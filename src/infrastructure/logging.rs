//! Logging system configuration and initialization
//!
//! This module provides the logging setup shared by both binaries:
//! - Console output with RFC 3339 timestamps
//! - Optional file output (`<log_dir>/collector.log`), plain or JSON
//! - `RUST_LOG` overrides the configured level entirely

use anyhow::{Context, Result};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

/// Log file written when `file_output` is enabled
pub const LOG_FILE_NAME: &str = "collector.log";

/// Builds the filter: `RUST_LOG` if set, otherwise the configured level with
/// HTTP internals quieted unless tracing is requested.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    if !config.level.to_lowercase().contains("trace") {
        for directive in ["reqwest=info", "hyper=warn", "hyper_util=warn", "h2=warn", "html5ever=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = build_env_filter(config)?;

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(ChronoUtc::rfc_3339())
            .with_target(false)
    });

    let (file_layer, guard) = if config.file_output {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory {}", config.log_dir.display())
        })?;
        let (writer, guard) = non_blocking(rolling::never(&config.log_dir, LOG_FILE_NAME));

        let layer = if config.json_format {
            fmt::Layer::new()
                .json()
                .with_writer(writer)
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::Layer::new()
                .with_writer(writer)
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(false)
                .with_ansi(false)
                .boxed()
        };
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialized (level: {}, console: {}, file: {})",
        config.level,
        config.console_output,
        config.file_output
    );
    Ok(guard)
}
