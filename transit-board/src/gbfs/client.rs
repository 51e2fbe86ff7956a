//! GBFS HTTP client.

use serde::de::DeserializeOwned;

use super::error::GbfsError;
use super::types::{GbfsFeed, StationInfoDto, StationList, StationStatusDto};

/// Default feed root: Capital Bikeshare, GBFS 2.3, English.
const DEFAULT_BASE_URL: &str = "https://gbfs.lyft.com/gbfs/2.3/dca-cabi/en";

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsConfig {
    /// Feed root; feed file names are appended to it
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GbfsConfig {
    /// Create a config for the default system.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }

    /// Set a custom feed root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GbfsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for one bikeshare system's GBFS feeds.
///
/// The feeds are public; no credential is sent.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
    base_url: String,
}

impl GbfsClient {
    /// Create a new GBFS client.
    pub fn new(config: GbfsConfig) -> Result<Self, GbfsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch live availability for every station in the system.
    pub async fn get_station_status(&self) -> Result<Vec<StationStatusDto>, GbfsError> {
        let feed: GbfsFeed<StationList<StationStatusDto>> =
            self.get_feed("station_status.json").await?;
        Ok(feed.data.stations)
    }

    /// Fetch names and capacity for every station in the system.
    pub async fn get_station_information(&self) -> Result<Vec<StationInfoDto>, GbfsError> {
        let feed: GbfsFeed<StationList<StationInfoDto>> =
            self.get_feed("station_information.json").await?;
        Ok(feed.data.stations)
    }

    async fn get_feed<T: DeserializeOwned>(&self, file: &str) -> Result<T, GbfsError> {
        let url = format!("{}/{}", self.base_url, file);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GbfsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| GbfsError::Json {
            message: e.to_string(),
        })
    }
}
