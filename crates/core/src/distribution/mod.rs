//! Bimester distribution of an activity's budget and target.
//!
//! - `types` - activity draft, bimesters, and raw-input boundary
//! - `summary` - live reconciliation view recomputed on every change
//! - `validator` - authoritative save-time check and persistence payload
//! - `error` - save-time validation errors

pub mod error;
pub mod summary;
pub mod types;
pub mod validator;

#[cfg(test)]
mod validator_props;

pub use error::{AmountField, DistributionError};
pub use summary::{
    BreakdownStatus, DiffStatus, PeriodFeedback, SummaryView, TotalsCheck, TotalsKind,
    period_feedback, recompute_summary,
};
pub use types::{ActivityDraft, BIMESTER_COUNT, Bimester, BimesterAllocation, RawAllocationInput};
pub use validator::{ActivitySavePayload, BimesterPayload, DistributionValidator};
