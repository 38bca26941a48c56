//! Ledger lookup and ceiling errors.

use metas_shared::types::Money;
use thiserror::Error;

/// Errors raised while fetching the area commitment rollup.
///
/// None of these block saving on their own: the ceiling check is skipped
/// while the rollup is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerFetchError {
    /// The request never produced a response.
    #[error("Budget service unreachable: {0}")]
    Transport(String),

    /// The service answered with its error envelope.
    #[error("Budget service rejected the request{}: {message}", code_suffix(.code.as_deref()))]
    Service {
        /// Machine-readable code, when the service sends one.
        code: Option<String>,
        /// Human-readable message.
        message: String,
    },

    /// The service answered with a non-success status and no usable body.
    #[error("Budget service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected budget service response: {0}")]
    MalformedResponse(String),
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl LedgerFetchError {
    /// Returns true when retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status } => *status >= 500,
            Self::Service { .. } | Self::MalformedResponse(_) => false,
        }
    }
}

/// Errors raised when a draft budget does not fit the area ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CeilingError {
    /// The area has no ceiling for the year.
    #[error("The area has no budget ceiling configured for {year}")]
    NoCeilingConfigured {
        /// Fiscal year of the lookup.
        year: i32,
    },

    /// Nothing is left under the ceiling.
    #[error("The area budget ceiling of {ceiling} is fully committed (available {available})")]
    CeilingFullyCommitted {
        /// Ceiling total.
        ceiling: Money,
        /// Available balance, zero or negative.
        available: Money,
    },

    /// The draft budget is larger than what is left.
    #[error("The activity budget of {draft} exceeds available balance by {excess} (available {available})")]
    ExceedsAvailable {
        /// Draft budget being checked.
        draft: Money,
        /// Available balance before this draft.
        available: Money,
        /// `draft - available`.
        excess: Money,
    },
}
