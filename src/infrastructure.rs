//! Infrastructure layer: HTTP fetching, markup parsing, channel resolution,
//! persistence, configuration and logging.

pub mod bulk_upload;
pub mod channel_resolver;
pub mod config;
pub mod fetcher;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod retry_policy;
pub mod roster_store;

// Re-export commonly used items
pub use bulk_upload::{BulkUploadClient, UploadError, UploadReport, load_records};
pub use channel_resolver::{ChannelResolver, Resolution};
pub use config::{AppConfig, ConfigError, HttpConfig, LoggingConfig, SourcesConfig, sources};
pub use fetcher::{FetchError, FetchResult, Fetcher};
pub use http_client::HttpClient;
pub use logging::init_logging_with_config;
pub use retry_policy::RetryPolicy;
pub use roster_store::{read_roster, write_roster};
