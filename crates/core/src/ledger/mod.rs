//! Area budget ledger resolution.
//!
//! This module reconciles an activity's draft budget with its area's ceiling:
//! - Ceiling and commitment rollup types
//! - Wire shapes of the budget service lookup
//! - The `LedgerSource` seam implemented by the HTTP gateway
//! - The resolver that keeps only the newest lookup's result
//! - The save-time ceiling check

pub mod ceiling;
pub mod error;
pub mod resolver;
pub mod source;
pub mod types;
pub mod wire;

pub use ceiling::validate_against_ceiling;
pub use error::{CeilingError, LedgerFetchError};
pub use resolver::{Completion, LedgerResolver, LedgerTicket, RollupState};
pub use source::LedgerSource;
pub use types::{AreaBudgetCeiling, CeilingSnapshot, CeilingStatus, CommitmentRollup};
pub use wire::{LedgerQuery, LedgerResponse, parse_error_envelope, parse_ledger_response};
