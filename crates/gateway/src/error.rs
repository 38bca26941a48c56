//! Gateway construction errors.

use metas_shared::AppError;
use thiserror::Error;

/// Errors raised while setting up the HTTP ledger client.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The configured base URL cannot be used.
    #[error("Invalid ledger service URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidBaseUrl { .. } => Self::Configuration(err.to_string()),
            GatewayError::Client(_) => Self::Internal(err.to_string()),
        }
    }
}
