//! WMATA client error types.

/// Ways a call to the WMATA API can fail.
#[derive(Debug, thiserror::Error)]
pub enum WmataError {
    #[error("WMATA request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 401 or 403: the key is wrong or not subscribed to the product
    #[error("WMATA rejected the API key (HTTP {status})")]
    KeyRejected { status: u16 },

    #[error("WMATA rate limit exceeded")]
    RateLimited,

    /// Any other non-2xx response
    #[error("WMATA returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body is not the expected payload
    #[error("unexpected WMATA payload: {message}")]
    Payload { message: String, body: String },

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("WMATA request limiter closed")]
    LimiterClosed,
}

impl WmataError {
    /// Classify a non-2xx response.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                WmataError::KeyRejected {
                    status: status.as_u16(),
                }
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => WmataError::RateLimited,
            _ => WmataError::Status {
                status: status.as_u16(),
                body,
            },
        }
    }
}
