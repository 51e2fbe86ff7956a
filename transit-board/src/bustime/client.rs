//! BusTime HTTP client.

use super::error::BusTimeError;
use super::types::{BusTimeEnvelope, BusTimeResponse};

/// Error messages BusTime uses when a stop simply has nothing coming.
const EMPTY_STOP_MESSAGES: &[&str] = &["No arrival times", "No service scheduled"];

/// Configuration for the BusTime client.
#[derive(Debug, Clone)]
pub struct BusTimeConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL up to and including the API version, e.g. `.../bustime/api/v3`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BusTimeConfig {
    /// Create a new config for the given server and key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 10,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for a BusTime server.
#[derive(Debug, Clone)]
pub struct BusTimeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BusTimeClient {
    /// Create a new BusTime client.
    pub fn new(config: BusTimeConfig) -> Result<Self, BusTimeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Fetch predictions for a stop.
    ///
    /// A stop with nothing scheduled comes back as an empty response, not
    /// an error.
    pub async fn get_predictions(&self, stop_id: &str) -> Result<BusTimeResponse, BusTimeError> {
        let url = format!("{}/getpredictions", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("stpid", stop_id),
                ("format", "json"),
            ])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BusTimeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let envelope: BusTimeEnvelope =
            serde_json::from_str(&body).map_err(|e| BusTimeError::Json {
                message: e.to_string(),
            })?;

        check_errors(envelope.response)
    }
}

/// Turn a response carrying only real error entries into an error.
fn check_errors(response: BusTimeResponse) -> Result<BusTimeResponse, BusTimeError> {
    if !response.prd.is_empty() || response.error.is_empty() {
        return Ok(response);
    }

    let fatal: Vec<&str> = response
        .error
        .iter()
        .map(|e| e.msg.as_str())
        .filter(|msg| !EMPTY_STOP_MESSAGES.iter().any(|benign| msg.starts_with(benign)))
        .collect();

    if fatal.is_empty() {
        Ok(BusTimeResponse::default())
    } else {
        Err(BusTimeError::Upstream {
            message: fatal.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bustime::{BusTimeApiError, BusTimePrediction};
    use axum::{Router, extract::Query, http::StatusCode, routing::get};
    use std::collections::HashMap;

    fn error(msg: &str) -> BusTimeApiError {
        BusTimeApiError {
            msg: msg.to_string(),
            stpid: Some("1043".into()),
        }
    }

    #[test]
    fn config_defaults() {
        let config = BusTimeConfig::new("http://localhost/bustime/api/v3", "k");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.with_timeout(3).timeout_secs, 3);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = BusTimeClient::new(BusTimeConfig::new("http://localhost/api/v3/", "k")).unwrap();
        assert_eq!(client.base_url, "http://localhost/api/v3");
    }

    #[test]
    fn no_arrivals_is_empty_not_error() {
        let response = BusTimeResponse {
            prd: vec![],
            error: vec![error("No arrival times")],
        };
        let checked = check_errors(response).unwrap();
        assert!(checked.prd.is_empty());
        assert!(checked.error.is_empty());
    }

    #[test]
    fn invalid_key_is_error() {
        let response = BusTimeResponse {
            prd: vec![],
            error: vec![error("Invalid API access key supplied")],
        };
        match check_errors(response) {
            Err(BusTimeError::Upstream { message }) => {
                assert_eq!(message, "Invalid API access key supplied");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn predictions_win_over_errors() {
        let response = BusTimeResponse {
            prd: vec![BusTimePrediction {
                rt: "AT2".into(),
                des: "Lincolnia".into(),
                prdctdn: "3".into(),
                stpnm: None,
                stpid: None,
                rtdir: None,
                dly: None,
            }],
            error: vec![error("Invalid API access key supplied")],
        };
        assert_eq!(check_errors(response).unwrap().prd.len(), 1);
    }

    /// Serve a tiny fake BusTime on a random local port. Stop `1043` has
    /// arrivals, `2000` has none, `3000` returns garbage and anything else
    /// is a server error.
    async fn fake_bustime() -> String {
        async fn predictions(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
            if params.get("key").map(String::as_str) != Some("secret")
                || params.get("format").map(String::as_str) != Some("json")
            {
                return (StatusCode::BAD_REQUEST, "bad query".into());
            }
            let body = match params.get("stpid").map(String::as_str) {
                Some("1043") => {
                    r#"{"bustime-response": {"prd": [
                        {"rt": "AT2", "des": "Lincolnia", "prdctdn": "4",
                         "stpnm": "KING ST+WASHINGTON ST", "stpid": "1043"}
                    ]}}"#
                }
                Some("2000") => {
                    r#"{"bustime-response": {"error": [
                        {"stpid": "2000", "msg": "No arrival times"}
                    ]}}"#
                }
                Some("3000") => "<html>maintenance</html>",
                _ => return (StatusCode::SERVICE_UNAVAILABLE, "down".into()),
            };
            (StatusCode::OK, body.to_string())
        }

        let app = Router::new().route("/bustime/api/v3/getpredictions", get(predictions));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/bustime/api/v3")
    }

    fn client(base: &str, key: &str) -> BusTimeClient {
        BusTimeClient::new(BusTimeConfig::new(base, key)).unwrap()
    }

    #[tokio::test]
    async fn fetches_predictions_with_key_and_stop() {
        let base = fake_bustime().await;

        let response = client(&base, "secret").get_predictions("1043").await.unwrap();

        assert_eq!(response.prd.len(), 1);
        assert_eq!(response.prd[0].rt, "AT2");
        assert_eq!(response.prd[0].prdctdn, "4");
        assert_eq!(response.prd[0].stpnm.as_deref(), Some("KING ST+WASHINGTON ST"));
    }

    #[tokio::test]
    async fn stop_without_arrivals_is_empty() {
        let base = fake_bustime().await;

        let response = client(&base, "secret").get_predictions("2000").await.unwrap();

        assert!(response.prd.is_empty());
        assert!(response.error.is_empty());
    }

    #[tokio::test]
    async fn wrong_key_is_api_error() {
        let base = fake_bustime().await;

        let result = client(&base, "wrong").get_predictions("1043").await;

        match result {
            Err(BusTimeError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad query");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let base = fake_bustime().await;

        let result = client(&base, "secret").get_predictions("9999").await;

        assert!(matches!(result, Err(BusTimeError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let base = fake_bustime().await;

        let result = client(&base, "secret").get_predictions("3000").await;

        assert!(matches!(result, Err(BusTimeError::Json { .. })));
    }
}
