use std::env;
use std::fmt;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_LISTINGS_ENDPOINT: &str = "https://www.common.com/cmn-api/listings/common";

/// Top-level configuration for the export run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_endpoint =
            env::var("LISTINGS_ENDPOINT").unwrap_or_else(|_| DEFAULT_LISTINGS_ENDPOINT.to_string());
        let endpoint = Url::parse(raw_endpoint.trim())
            .map_err(|source| ConfigError::InvalidEndpoint { source })?;

        let output_dir = env::var("LISTINGS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            feed: FeedConfig {
                endpoint,
                output_dir,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the feed is fetched from and where the tables land.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub endpoint: Url,
    pub output_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEndpoint { source: url::ParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEndpoint { .. } => {
                write!(f, "LISTINGS_ENDPOINT must be an absolute URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidEndpoint { source } => Some(source),
        }
    }
}
