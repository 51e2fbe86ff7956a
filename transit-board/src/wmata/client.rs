//! WMATA HTTP client.
//!
//! Every request carries the `api_key` header and waits for a slot in a
//! semaphore shared by all clones of the client.

use std::sync::Arc;

use reqwest::RequestBuilder;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::RailPrediction;

use super::convert::convert_train;
use super::error::WmataError;
use super::types::{BusPredictionResponse, RailPredictionResponse};

/// Production API root.
const DEFAULT_BASE_URL: &str = "https://api.wmata.com";

/// Requests allowed in flight at once.
///
/// The default WMATA tier allows 10 calls per second and every panel polls
/// on its own timer, so the client stays well under that.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for a [`WmataClient`].
#[derive(Debug, Clone)]
pub struct WmataConfig {
    /// Sent on every request in the `api_key` header
    pub api_key: String,
    pub base_url: String,
    /// Shared by every clone of the client
    pub max_concurrent: usize,
    pub timeout_secs: u64,
}

impl WmataConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point the client at another API root, such as a local fake.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Cap requests in flight and bound how long each may take.
    pub fn with_limits(mut self, max_concurrent: usize, timeout_secs: u64) -> Self {
        self.max_concurrent = max_concurrent;
        self.timeout_secs = timeout_secs;
        self
    }
}

/// WMATA API client.
///
/// Cheap to clone; clones share the connection pool and request limit.
#[derive(Debug, Clone)]
pub struct WmataClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl WmataClient {
    /// Create a new WMATA client with the given configuration.
    pub fn new(config: WmataConfig) -> Result<Self, WmataError> {
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| WmataError::InvalidApiKey)?;
        let headers = HeaderMap::from_iter([(HeaderName::from_static("api_key"), api_key)]);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Get the raw prediction board for one platform code.
    pub async fn get_rail_predictions_raw(
        &self,
        station_code: &str,
    ) -> Result<RailPredictionResponse, WmataError> {
        let url = format!(
            "{}/StationPrediction.svc/json/GetPrediction/{}",
            self.base_url, station_code
        );
        self.get_json(self.http.get(&url)).await
    }

    /// Get predictions for one platform code, converted to domain types.
    ///
    /// Only trains reported for this code are returned; transfer stations
    /// need one call per companion code.
    pub async fn get_rail_predictions(
        &self,
        station_code: &str,
    ) -> Result<Vec<RailPrediction>, WmataError> {
        let response = self.get_rail_predictions_raw(station_code).await?;
        Ok(response.trains.iter().map(convert_train).collect())
    }

    /// Get bus predictions for a stop.
    pub async fn get_bus_predictions(
        &self,
        stop_id: &str,
    ) -> Result<BusPredictionResponse, WmataError> {
        let url = format!("{}/NextBusService.svc/json/jPredictions", self.base_url);
        self.get_json(self.http.get(&url).query(&[("StopID", stop_id)]))
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, WmataError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| WmataError::LimiterClosed)?;

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WmataError::from_status(status, truncate(&body)));
        }

        serde_json::from_str(&body).map_err(|e| WmataError::Payload {
            message: e.to_string(),
            body: truncate(&body),
        })
    }
}

/// Keep error bodies short enough to log.
fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, RailStatus};
    use axum::{Router, http::HeaderMap as AxumHeaders, http::StatusCode, routing::get};

    #[test]
    fn config_defaults_and_limits() {
        let config = WmataConfig::new("test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let config = config.with_base_url("http://localhost:8080").with_limits(2, 30);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        assert!(WmataClient::new(WmataConfig::new("test-key")).is_ok());
    }

    #[test]
    fn invalid_api_key_rejected() {
        let result = WmataClient::new(WmataConfig::new("bad\nkey"));
        assert!(matches!(result, Err(WmataError::InvalidApiKey)));
    }

    /// Serve a tiny fake WMATA on a random local port.
    async fn fake_wmata() -> String {
        async fn prediction(headers: AxumHeaders) -> (StatusCode, String) {
            if headers.get("api_key").and_then(|v| v.to_str().ok()) != Some("secret") {
                return (StatusCode::UNAUTHORIZED, String::new());
            }
            let body = r#"{"Trains": [
                {"DestinationCode": "A15", "DestinationName": "Shady Grv",
                 "Line": "RD", "Min": "BRD"},
                {"DestinationCode": "B11", "DestinationName": "Glenmont",
                 "Line": "RD", "Min": "6"}
            ]}"#;
            (StatusCode::OK, body.to_string())
        }

        let app = Router::new()
            .route(
                "/StationPrediction.svc/json/GetPrediction/:code",
                get(prediction),
            )
            .route(
                "/NextBusService.svc/json/jPredictions",
                get(|| async { "not json" }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_and_converts_rail_predictions() {
        let base = fake_wmata().await;
        let client = WmataClient::new(WmataConfig::new("secret").with_base_url(base)).unwrap();

        let predictions = client.get_rail_predictions("A01").await.unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].line, Line::Red);
        assert_eq!(predictions[0].status, RailStatus::Boarding);
        assert_eq!(predictions[1].status, RailStatus::Minutes(6));
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let base = fake_wmata().await;
        let client = WmataClient::new(WmataConfig::new("wrong").with_base_url(base)).unwrap();

        let result = client.get_rail_predictions("A01").await;

        assert!(matches!(result, Err(WmataError::KeyRejected { status: 401 })));
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let base = fake_wmata().await;
        let client = WmataClient::new(WmataConfig::new("secret").with_base_url(base)).unwrap();

        let result = client.get_bus_predictions("1001195").await;

        match result {
            Err(WmataError::Payload { body, .. }) => assert_eq!(body, "not json"),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }
}
