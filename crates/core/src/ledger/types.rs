//! Area ceiling and commitment rollup types.

use chrono::NaiveDate;
use metas_shared::format::percentage;
use metas_shared::types::{AreaId, Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a ceiling version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeilingStatus {
    /// Submitted, not yet approved.
    #[serde(alias = "Proposed", alias = "PROPOSED", alias = "propuesto", alias = "Propuesto")]
    Proposed,
    /// Approved.
    #[serde(alias = "Approved", alias = "APPROVED", alias = "aprobado", alias = "Aprobado")]
    Approved,
    /// Approved and later amended.
    #[serde(alias = "Modified", alias = "MODIFIED", alias = "modificado", alias = "Modificado")]
    Modified,
    /// Temporarily frozen.
    #[serde(alias = "Suspended", alias = "SUSPENDED", alias = "suspendido", alias = "Suspendido")]
    Suspended,
    /// Closed for the year.
    #[serde(alias = "Closed", alias = "CLOSED", alias = "cerrado", alias = "Cerrado")]
    Closed,
}

/// Ceiling figures as reported by the budget service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeilingSnapshot {
    /// Ceiling amount for the year.
    pub total: Decimal,
    /// Monotonic version number.
    pub version: u32,
    /// Inclusive start of validity.
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    /// Exclusive end of validity.
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: CeilingStatus,
    /// Currency of the ceiling amounts.
    #[serde(default)]
    pub currency: Currency,
}

impl CeilingSnapshot {
    /// Returns true when `date` falls within `[valid_from, valid_to)`.
    ///
    /// Missing bounds are open.
    #[must_use]
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from.is_none_or(|from| date >= from) && self.valid_to.is_none_or(|to| date < to)
    }
}

/// The ceiling version the backend reports as current for an area and year.
///
/// Uniqueness of the current version is the backend's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaBudgetCeiling {
    /// Owning area.
    pub area_id: AreaId,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Whether the backend flags this version as current.
    pub is_current: bool,
    /// Reported figures.
    pub snapshot: CeilingSnapshot,
}

/// Area-level commitment figures with an "as if saved" estimate for a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitmentRollup {
    /// The ceiling this rollup was computed against.
    pub ceiling: AreaBudgetCeiling,
    /// Ceiling total, as returned.
    pub total_ceiling: Decimal,
    /// Sum of the area's other saved activities, as returned.
    pub committed: Decimal,
    /// `total_ceiling - committed`, as returned.
    pub available: Decimal,
    /// `available` as captured at fetch time; draft edits estimate against it.
    pub baseline_available: Decimal,
    /// Draft budget the estimate below was computed for.
    pub draft_budget: Decimal,
    /// `baseline_available - draft_budget`, saturating at the `Decimal` bounds.
    pub available_after_edit: Decimal,
}

impl CommitmentRollup {
    /// Builds a rollup from fetched figures and the draft budget at request time.
    #[must_use]
    pub fn new(
        ceiling: AreaBudgetCeiling,
        committed: Decimal,
        available: Decimal,
        draft_budget: Decimal,
    ) -> Self {
        Self {
            total_ceiling: ceiling.snapshot.total,
            ceiling,
            committed,
            available,
            baseline_available: available,
            draft_budget,
            available_after_edit: available.saturating_sub(draft_budget),
        }
    }

    /// Returns a copy estimated for a different draft budget, without refetching.
    #[must_use]
    pub fn with_draft_budget(&self, draft_budget: Decimal) -> Self {
        Self {
            draft_budget,
            available_after_edit: self.baseline_available.saturating_sub(draft_budget),
            ..self.clone()
        }
    }

    /// Wraps an amount in the ceiling's currency.
    #[must_use]
    pub const fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.ceiling.snapshot.currency)
    }

    /// Share of the ceiling already committed, in percent.
    #[must_use]
    pub fn committed_percent(&self) -> Decimal {
        percentage(self.committed, self.total_ceiling)
    }

    /// Returns true when the rollup was fetched for this area and year.
    #[must_use]
    pub fn matches(&self, area_id: AreaId, fiscal_year: i32) -> bool {
        self.ceiling.area_id == area_id && self.ceiling.fiscal_year == fiscal_year
    }
}
