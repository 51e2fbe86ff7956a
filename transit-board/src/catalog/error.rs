//! Catalog error types.

/// Errors from loading or querying the station catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No station owns the requested code
    #[error("unknown station code: {0}")]
    NotFound(String),

    /// The reference data is malformed
    #[error("invalid station data: {message}")]
    Load { message: String },
}
