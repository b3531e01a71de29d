use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt::Debug;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("rental-feed/", env!("CARGO_PKG_VERSION"));

/// Why the feed could not be retrieved. Every variant is handled the same way
/// by the export: nothing is written and the run ends cleanly.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("listing feed request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("listing feed answered with status {0}")]
    Status(StatusCode),
    #[error("listing feed body is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

pub trait ListingSource: Debug {
    fn fetch(&self) -> Result<Value, FetchFailure>;
}

/// Issues a single blocking GET against the feed endpoint.
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    endpoint: Url,
}

impl HttpListingSource {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ListingSource for HttpListingSource {
    fn fetch(&self) -> Result<Value, FetchFailure> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchFailure::Transport)?;

        debug!(endpoint = %self.endpoint, "requesting listing feed");
        let response = client
            .get(self.endpoint.clone())
            .send()
            .map_err(FetchFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }

        response.json::<Value>().map_err(FetchFailure::Decode)
    }
}

/// Serves a payload that is already in memory.
#[derive(Debug, Clone)]
pub struct StaticListingSource {
    payload: Value,
}

impl StaticListingSource {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

impl ListingSource for StaticListingSource {
    fn fetch(&self) -> Result<Value, FetchFailure> {
        Ok(self.payload.clone())
    }
}
