//! Configuration infrastructure
//!
//! Contains configuration loading for the roster collector and the upload tool.
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. Optional config file (`config/collector.*`, or the path in `VTROSTER_CONFIG`)
//! 3. Environment variables prefixed with `VTROSTER_`, nested with `__`
//!    (e.g. `VTROSTER_HTTP__TIMEOUT_SECONDS=30`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use super::retry_policy::RetryPolicy;

/// Default config file (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_FILE: &str = "config/collector";
/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "VTROSTER_CONFIG";
/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "VTROSTER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {field} - {message}")]
    Validation { field: String, message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// Fetch gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub retry: RetryPolicy,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "VTuber-DB-Collector/1.0 (+https://github.com/yuya-fujita-1201/VTuber-DB)"
                .to_string(),
            timeout_seconds: 20,
            retry: RetryPolicy::default(),
        }
    }
}

/// Source endpoints and politeness delays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub hololive_talents_url: String,
    pub holostars_talents_url: String,
    pub nijisanji_base_url: String,
    /// Locale segment of the generated data paths
    pub nijisanji_locale: String,
    pub wiki_base_url: String,
    /// Pause after each recorded talent (milliseconds)
    pub hololive_delay_ms: u64,
    pub nijisanji_delay_ms: u64,
    pub wiki_delay_ms: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            hololive_talents_url: sources::HOLOLIVE_TALENTS.to_string(),
            holostars_talents_url: sources::HOLOSTARS_TALENTS.to_string(),
            nijisanji_base_url: sources::NIJISANJI_BASE.to_string(),
            nijisanji_locale: "ja".to_string(),
            wiki_base_url: sources::WIKI_BASE.to_string(),
            hololive_delay_ms: 50,
            nijisanji_delay_ms: 30,
            wiki_delay_ms: 50,
        }
    }
}

impl SourcesConfig {
    /// Same endpoints with every politeness delay disabled
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.hololive_delay_ms = 0;
        self.nijisanji_delay_ms = 0;
        self.wiki_delay_ms = 0;
        self
    }

    /// `{wiki_base}/api.php`
    #[must_use]
    pub fn wiki_api_url(&self) -> String {
        format!("{}/api.php", self.wiki_base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/vtuber_agencies_full.json"),
        }
    }
}

/// Bulk upload tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    /// JSON array files uploaded in order
    pub input_files: Vec<PathBuf>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://vtuber-db.sam-y-1201.workers.dev".to_string(),
            timeout_seconds: 300,
            input_files: vec![
                PathBuf::from("data/hololive-data.json"),
                PathBuf::from("data/nijisanji-data.json"),
            ],
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,
    /// Enable JSON formatted file logs
    pub json_format: bool,
    pub console_output: bool,
    pub file_output: bool,
    /// Directory for the log file
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the config file, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_file(&path)
    }

    /// Loads with an explicit (optional) config file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.retry.max_attempts == 0 {
            return Err(ConfigError::Validation {
                field: "http.retry.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "http.timeout_seconds".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        for (field, value) in [
            ("sources.hololive_talents_url", &self.sources.hololive_talents_url),
            ("sources.holostars_talents_url", &self.sources.holostars_talents_url),
            ("sources.nijisanji_base_url", &self.sources.nijisanji_base_url),
            ("sources.wiki_base_url", &self.sources.wiki_base_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Fixed source endpoints and the wiki agency catalogue
pub mod sources {
    /// Official hololive talent index
    pub const HOLOLIVE_TALENTS: &str = "https://hololive.hololivepro.com/talents";

    /// Bare form of a hololive profile URL; `{}` is the talent slug
    pub const HOLOLIVE_PROFILE: &str = "https://hololive.hololivepro.com/talents/{}/";

    /// Official holostars talent index
    pub const HOLOSTARS_TALENTS: &str = "https://holostars.hololivepro.com/talent";

    /// nijisanji site root; talents page and `_next/data` paths hang off it
    pub const NIJISANJI_BASE: &str = "https://www.nijisanji.jp";

    /// Virtual YouTuber wiki (MediaWiki)
    pub const WIKI_BASE: &str = "https://virtualyoutuber.fandom.com";

    /// A wiki-sourced agency
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WikiAgency {
        pub name: &'static str,
        pub name_en: &'static str,
        pub wiki_page: &'static str,
    }

    /// Agencies collected from the wiki, in output order
    pub const WIKI_AGENCIES: &[WikiAgency] = &[
        WikiAgency { name: "ぶいすぽっ!", name_en: "vspo", wiki_page: "VSPO!" },
        WikiAgency { name: "Re:AcT", name_en: "react", wiki_page: "Re:AcT" },
        WikiAgency { name: "Neo-Porte", name_en: "neo-porte", wiki_page: "Neo-Porte" },
        WikiAgency { name: ".LIVE", name_en: "dotlive", wiki_page: ".LIVE" },
        WikiAgency { name: "PRISM Project", name_en: "prism-project", wiki_page: "PRISM Project" },
        WikiAgency { name: "Phase-Connect", name_en: "phase-connect", wiki_page: "Phase-Connect" },
        WikiAgency { name: "ななしいんく", name_en: "nanashiinku", wiki_page: "Nanashiinku" },
        WikiAgency { name: "VShojo", name_en: "vshojo", wiki_page: "VShojo" },
    ];

    /// Bare profile URL for a hololive talent slug
    #[must_use]
    pub fn hololive_profile_url(slug: &str) -> String {
        HOLOLIVE_PROFILE.replace("{}", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.retry.max_attempts, 3);
        assert_eq!(config.upload.timeout_seconds, 300);
        assert_eq!(config.output.path, PathBuf::from("data/vtuber_agencies_full.json"));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let mut config = AppConfig::default();
        config.http.retry.max_attempts = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "http.retry.max_attempts"
        ));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.toml");
        std::fs::write(
            &path,
            "[output]\npath = \"out/roster.json\"\n\n[http.retry]\nmax_attempts = 5\n",
        )
        .unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.output.path, PathBuf::from("out/roster.json"));
        assert_eq!(config.http.retry.max_attempts, 5);
        assert_eq!(config.http.retry.base_delay_ms, 1000);
        assert_eq!(config.sources.wiki_base_url, sources::WIKI_BASE);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::from_file("config/definitely-not-here").unwrap();
        assert_eq!(config.sources.hololive_talents_url, sources::HOLOLIVE_TALENTS);
    }

    #[test]
    fn wiki_api_url_and_profile_urls() {
        let sources_config = SourcesConfig::default();
        assert_eq!(
            sources_config.wiki_api_url(),
            "https://virtualyoutuber.fandom.com/api.php"
        );
        assert_eq!(
            sources::hololive_profile_url("tokino-sora"),
            "https://hololive.hololivepro.com/talents/tokino-sora/"
        );
        assert_eq!(sources::WIKI_AGENCIES.len(), 8);
    }
}
