//! Fetch failure kind recorded by pollers.

/// Why a fetch cycle produced no new result.
///
/// Network, HTTP status and payload errors all collapse into
/// [`FetchError::FetchFailed`]; the display only needs to know that an
/// error is present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("fetch failed: {message}")]
    FetchFailed { message: String },
}

impl FetchError {
    /// Wrap any upstream error.
    pub fn failed(err: impl std::fmt::Display) -> Self {
        FetchError::FetchFailed {
            message: err.to_string(),
        }
    }
}
