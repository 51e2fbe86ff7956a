//! BusTime API error types.

/// Errors that can occur when interacting with the BusTime API.
#[derive(Debug, thiserror::Error)]
pub enum BusTimeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The response carried an error entry instead of predictions
    #[error("BusTime error: {message}")]
    Upstream { message: String },
}
