//! Save-time distribution check and persistence payload.
//!
//! The check re-derives everything from the submitted draft rather than from
//! the last [`SummaryView`](super::summary::SummaryView) shown to the user.

use metas_shared::format::round_amount;
use metas_shared::types::{ActivityId, AreaId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{AmountField, DistributionError};
use super::summary::{BreakdownStatus, DiffStatus, period_feedback};
use super::types::{ActivityDraft, BIMESTER_COUNT, Bimester, BimesterAllocation};

/// Stateless validator for activity distributions.
pub struct DistributionValidator;

impl DistributionValidator {
    /// Validates a draft immediately before persistence.
    ///
    /// Checks run in this order and stop at the first violation:
    /// 1. exactly six distinct periods
    /// 2. no negative totals, budgets, or targets
    /// 3. period budgets add up to the activity budget
    /// 4. period targets add up to the activity target
    /// 5. no zero-target or over-target breakdown
    ///
    /// # Errors
    ///
    /// Returns the first `DistributionError` found.
    pub fn validate_for_save(draft: &ActivityDraft) -> Result<(), DistributionError> {
        Self::check_periods(&draft.allocations)?;
        Self::check_non_negative(draft)?;
        Self::check_budget_sum(draft)?;
        Self::check_target_sum(draft)?;
        Self::check_breakdowns(&draft.allocations)
    }

    /// Validates the draft and builds the persistence payload.
    ///
    /// Periods are emitted in calendar order with their breakdown totals
    /// filled in.
    ///
    /// # Errors
    ///
    /// Returns the first `DistributionError` found.
    pub fn build_save_payload(draft: &ActivityDraft) -> Result<ActivitySavePayload, DistributionError> {
        Self::validate_for_save(draft)?;

        let mut allocations: Vec<&BimesterAllocation> = draft.allocations.iter().collect();
        allocations.sort_by_key(|a| a.bimester);

        let bimestres = allocations
            .into_iter()
            .map(|allocation| BimesterPayload {
                index: allocation.bimester.index(),
                budget: allocation.budget,
                target: allocation.target,
                breakdown_text: allocation.breakdown().unwrap_or_default().to_string(),
                breakdown_quantity_total: period_feedback(allocation).breakdown_total,
            })
            .collect();

        Ok(ActivitySavePayload {
            id: draft.id,
            area_id: draft.area_id,
            total_budget: draft.total_budget,
            total_target: draft.total_target,
            bimestres,
        })
    }

    fn check_periods(allocations: &[BimesterAllocation]) -> Result<(), DistributionError> {
        if allocations.len() != BIMESTER_COUNT {
            return Err(DistributionError::WrongPeriodCount {
                found: allocations.len(),
            });
        }

        let mut seen = [false; BIMESTER_COUNT];
        for allocation in allocations {
            let slot = usize::from(allocation.bimester.index()) - 1;
            if seen[slot] {
                return Err(DistributionError::DuplicatePeriod {
                    bimester: allocation.bimester,
                });
            }
            seen[slot] = true;
        }
        Ok(())
    }

    fn check_non_negative(draft: &ActivityDraft) -> Result<(), DistributionError> {
        for (field, value) in [
            (AmountField::Budget, draft.total_budget),
            (AmountField::Target, draft.total_target),
        ] {
            if value < Decimal::ZERO {
                return Err(DistributionError::NegativeTotal { field, value });
            }
        }

        for allocation in &draft.allocations {
            for (field, value) in [
                (AmountField::Budget, allocation.budget),
                (AmountField::Target, allocation.target),
            ] {
                if value < Decimal::ZERO {
                    return Err(DistributionError::NegativeAllocation {
                        bimester: allocation.bimester,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_budget_sum(draft: &ActivityDraft) -> Result<(), DistributionError> {
        let allocated = draft.allocated_budget();
        let diff = round_amount(allocated.saturating_sub(draft.total_budget));
        match DiffStatus::classify(diff) {
            DiffStatus::Balanced => Ok(()),
            status => Err(DistributionError::BudgetMismatch {
                allocated: draft.money(allocated),
                declared: draft.money(draft.total_budget),
                difference: draft.money(diff.abs()),
                status,
            }),
        }
    }

    fn check_target_sum(draft: &ActivityDraft) -> Result<(), DistributionError> {
        let allocated = draft.allocated_target();
        let diff = round_amount(allocated.saturating_sub(draft.total_target));
        match DiffStatus::classify(diff) {
            DiffStatus::Balanced => Ok(()),
            status => Err(DistributionError::TargetMismatch {
                allocated,
                declared: draft.total_target,
                difference: diff.abs(),
                status,
            }),
        }
    }

    fn check_breakdowns(allocations: &[BimesterAllocation]) -> Result<(), DistributionError> {
        let mut ordered: Vec<&BimesterAllocation> = allocations.iter().collect();
        ordered.sort_by_key(|a| a.bimester);

        for allocation in ordered {
            let feedback = period_feedback(allocation);
            match feedback.status {
                BreakdownStatus::ZeroTargetViolation => {
                    return Err(DistributionError::ZeroTargetBreakdown {
                        bimester: allocation.bimester,
                        described: feedback.breakdown_total,
                    });
                }
                BreakdownStatus::OverTarget => {
                    return Err(DistributionError::BreakdownExceedsTarget {
                        bimester: allocation.bimester,
                        described: feedback.breakdown_total,
                        target: allocation.target,
                        excess: feedback.breakdown_total.saturating_sub(allocation.target),
                    });
                }
                BreakdownStatus::None | BreakdownStatus::UnderTarget | BreakdownStatus::Complete => {}
            }
        }
        Ok(())
    }
}

/// One period as sent to the persistence call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BimesterPayload {
    /// Period index, 1..=6.
    pub index: u8,
    /// Planned budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    /// Planned target.
    #[serde(with = "rust_decimal::serde::float")]
    pub target: Decimal,
    /// Breakdown text, empty when none was given.
    pub breakdown_text: String,
    /// Quantity extracted from the breakdown text.
    #[serde(with = "rust_decimal::serde::float")]
    pub breakdown_quantity_total: Decimal,
}

/// Activity save request produced once validation passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySavePayload {
    /// Present when updating an existing activity.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ActivityId>,
    /// Owning area.
    pub area_id: Option<AreaId>,
    /// Declared budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_budget: Decimal,
    /// Declared target.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_target: Decimal,
    /// The six periods in calendar order.
    pub bimestres: Vec<BimesterPayload>,
}

impl ActivitySavePayload {
    /// Returns the payload entry for a period.
    #[must_use]
    pub fn period(&self, bimester: Bimester) -> Option<&BimesterPayload> {
        self.bimestres.iter().find(|p| p.index == bimester.index())
    }
}
