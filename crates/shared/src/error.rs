//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types surfaced to the UI host.
///
/// None of these are fatal: each one ends up as a field-level or form-level
/// message the user can act on.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed a distribution or sum invariant.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g., area ceiling exceeded).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// The external budget service failed or answered with an unexpected shape.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for host-side message catalogs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the user can resolve the error by correcting input.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::BusinessRule(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
