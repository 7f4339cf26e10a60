//! Catalog backend error types

use thiserror::Error;

/// Errors that can occur when talking to a catalog backend
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CatalogError {
    /// Whether the failure came from the deployment rather than the backend
    pub fn is_configuration(&self) -> bool {
        matches!(self, CatalogError::Configuration(_))
    }
}
