//! Live reconciliation summary, recomputed on every field change.
//!
//! [`recompute_summary`] is a pure function of the draft: calling it twice on
//! the same state yields the same view.

use metas_shared::TOLERANCE;
use metas_shared::format::{Semaphore, format_number, percentage, round_amount, within_tolerance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{ActivityDraft, Bimester, BimesterAllocation};
use crate::quantity::sum_quantities;

/// How allocated values compare with a declared total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// Within tolerance.
    Balanced,
    /// Allocations fall short of the total.
    Short,
    /// Allocations exceed the total.
    Over,
}

impl DiffStatus {
    /// Classifies `allocated - declared`.
    #[must_use]
    pub fn classify(diff: Decimal) -> Self {
        if within_tolerance(diff, Decimal::ZERO) {
            Self::Balanced
        } else if diff.is_sign_negative() {
            Self::Short
        } else {
            Self::Over
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Balanced => write!(f, "balanced"),
            Self::Short => write!(f, "short"),
            Self::Over => write!(f, "over"),
        }
    }
}

/// Which totals group a check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsKind {
    /// Budget amounts, rendered as currency.
    Budget,
    /// Target quantities, rendered as plain numbers.
    Target,
}

/// Reconciliation of one totals group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsCheck {
    /// Budget or target.
    pub kind: TotalsKind,
    /// Declared activity total.
    pub declared: Decimal,
    /// Sum of the six periods.
    pub allocated: Decimal,
    /// `allocated - declared`, rounded to two decimals and saturating at the `Decimal` bounds.
    pub diff: Decimal,
    /// Classification of `diff`.
    pub status: DiffStatus,
    /// Display color.
    pub semaphore: Semaphore,
    /// Human-facing status line.
    pub message: String,
}

/// Consistency of a period's breakdown text with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownStatus {
    /// No breakdown text.
    None,
    /// Target is zero but the text describes a positive quantity.
    ZeroTargetViolation,
    /// The text describes more than the target.
    OverTarget,
    /// The text describes less than the target (informational).
    UnderTarget,
    /// The text matches the target within tolerance.
    Complete,
}

impl BreakdownStatus {
    /// Classifies a breakdown total against its period target.
    ///
    /// Zero-target is checked before over-target.
    #[must_use]
    pub fn classify(has_text: bool, breakdown_total: Decimal, target: Decimal) -> Self {
        if !has_text {
            Self::None
        } else if target <= Decimal::ZERO && breakdown_total > Decimal::ZERO {
            Self::ZeroTargetViolation
        } else if breakdown_total > target.saturating_add(TOLERANCE) {
            Self::OverTarget
        } else if breakdown_total < target.saturating_sub(TOLERANCE) {
            Self::UnderTarget
        } else {
            Self::Complete
        }
    }

    /// Returns true when this state prevents saving.
    #[must_use]
    pub const fn blocks_save(self) -> bool {
        matches!(self, Self::ZeroTargetViolation | Self::OverTarget)
    }
}

/// Per-period breakdown feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodFeedback {
    /// The period.
    pub bimester: Bimester,
    /// Quantity extracted from the breakdown text.
    pub breakdown_total: Decimal,
    /// Classification against the target.
    pub status: BreakdownStatus,
    /// `breakdown_total / target * 100`.
    pub coverage_percent: Decimal,
    /// Display color for the coverage.
    pub semaphore: Semaphore,
    /// Message for the breakdown field, absent when there is no text.
    pub message: Option<String>,
}

/// Everything the form displays about the current distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    /// Budget reconciliation.
    pub budget: TotalsCheck,
    /// Target reconciliation.
    pub target: TotalsCheck,
    /// Breakdown feedback, one entry per allocation.
    pub periods: Vec<PeriodFeedback>,
    /// Period containing the effective start date, when one is set.
    pub start_period: Option<Bimester>,
}

impl SummaryView {
    /// Returns true when the distribution as shown cannot be saved.
    #[must_use]
    pub fn blocks_save(&self) -> bool {
        self.budget.status != DiffStatus::Balanced
            || self.target.status != DiffStatus::Balanced
            || self.periods.iter().any(|p| p.status.blocks_save())
    }
}

/// Recomputes the summary from the current draft fields.
#[must_use]
pub fn recompute_summary(draft: &ActivityDraft) -> SummaryView {
    SummaryView {
        budget: totals_check(
            TotalsKind::Budget,
            draft,
            draft.total_budget,
            draft.allocated_budget(),
        ),
        target: totals_check(
            TotalsKind::Target,
            draft,
            draft.total_target,
            draft.allocated_target(),
        ),
        periods: draft.allocations.iter().map(period_feedback).collect(),
        start_period: draft.start_bimester(),
    }
}

fn totals_check(
    kind: TotalsKind,
    draft: &ActivityDraft,
    declared: Decimal,
    allocated: Decimal,
) -> TotalsCheck {
    let diff = round_amount(allocated.saturating_sub(declared));
    let status = DiffStatus::classify(diff);
    let render = |value: Decimal| match kind {
        TotalsKind::Budget => draft.money(value).to_string(),
        TotalsKind::Target => format_number(value),
    };
    let noun = match kind {
        TotalsKind::Budget => "Budget",
        TotalsKind::Target => "Target",
    };

    let message = match status {
        DiffStatus::Balanced => format!("{noun} fully distributed ({})", render(declared)),
        DiffStatus::Short => format!(
            "{noun} distribution is short by {} ({} of {})",
            render(diff.abs()),
            render(allocated),
            render(declared)
        ),
        DiffStatus::Over => format!(
            "{noun} distribution is over by {} ({} of {})",
            render(diff),
            render(allocated),
            render(declared)
        ),
    };

    TotalsCheck {
        kind,
        declared,
        allocated,
        diff,
        status,
        semaphore: Semaphore::for_diff(diff),
        message,
    }
}

/// Classifies one allocation's breakdown text.
#[must_use]
pub fn period_feedback(allocation: &BimesterAllocation) -> PeriodFeedback {
    let text = allocation.breakdown();
    let breakdown_total = text.map_or(Decimal::ZERO, sum_quantities);
    let target = allocation.target;
    let status = BreakdownStatus::classify(text.is_some(), breakdown_total, target);

    let message = match status {
        BreakdownStatus::None => None,
        BreakdownStatus::ZeroTargetViolation => Some(format!(
            "Target is 0 but the breakdown describes {}",
            format_number(breakdown_total)
        )),
        BreakdownStatus::OverTarget => Some(format!(
            "Breakdown describes {}, exceeding the target of {} by {}",
            format_number(breakdown_total),
            format_number(target),
            format_number(breakdown_total.saturating_sub(target))
        )),
        BreakdownStatus::UnderTarget => Some(format!(
            "Breakdown describes {} of {} ({}%)",
            format_number(breakdown_total),
            format_number(target),
            format_number(percentage(breakdown_total, target))
        )),
        BreakdownStatus::Complete => Some("Breakdown matches the target".to_string()),
    };

    PeriodFeedback {
        bimester: allocation.bimester,
        breakdown_total,
        status,
        coverage_percent: percentage(breakdown_total, target),
        semaphore: match status {
            BreakdownStatus::ZeroTargetViolation | BreakdownStatus::OverTarget => Semaphore::Red,
            _ => Semaphore::for_progress(breakdown_total, target),
        },
        message,
    }
}
