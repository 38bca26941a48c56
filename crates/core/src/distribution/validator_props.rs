//! Property-based tests for distribution reconciliation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::DistributionError;
use super::summary::{DiffStatus, recompute_summary};
use super::types::ActivityDraft;
use super::validator::DistributionValidator;

/// Strategy for six period budgets between 0.00 and 1,000,000.00.
fn period_amounts() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2)), 6)
}

fn draft_from(budgets: &[Decimal], total_budget: Decimal) -> ActivityDraft {
    let mut draft = ActivityDraft::new();
    draft.total_budget = total_budget;
    for (allocation, budget) in draft.allocations.iter_mut().zip(budgets) {
        allocation.budget = *budget;
    }
    draft
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Budgets that add up to the declared total never trip the budget check.
    #[test]
    fn prop_matching_budget_sum_passes(budgets in period_amounts()) {
        let total: Decimal = budgets.iter().copied().sum();
        let draft = draft_from(&budgets, total);

        prop_assert!(DistributionValidator::validate_for_save(&draft).is_ok());
        prop_assert_eq!(recompute_summary(&draft).budget.status, DiffStatus::Balanced);
    }

    /// Any gap of at least one cent is reported with its exact magnitude.
    #[test]
    fn prop_budget_gap_reported(budgets in period_amounts(), gap_cents in 1i64..1_000_000) {
        let gap = Decimal::new(gap_cents, 2);
        let total: Decimal = budgets.iter().copied().sum::<Decimal>() + gap;
        let draft = draft_from(&budgets, total);

        let summary = recompute_summary(&draft);
        prop_assert_eq!(summary.budget.diff, -gap);
        prop_assert_eq!(summary.budget.status, DiffStatus::Short);

        match DistributionValidator::validate_for_save(&draft) {
            Err(DistributionError::BudgetMismatch { difference, status, .. }) => {
                prop_assert_eq!(difference.amount, gap);
                prop_assert_eq!(status, DiffStatus::Short);
            }
            other => prop_assert!(false, "expected budget mismatch, got {:?}", other),
        }
    }

    /// Recomputing twice on unchanged state gives identical results.
    #[test]
    fn prop_summary_idempotent(budgets in period_amounts(), total_cents in 0i64..600_000_000) {
        let draft = draft_from(&budgets, Decimal::new(total_cents, 2));
        prop_assert_eq!(recompute_summary(&draft), recompute_summary(&draft));
    }
}
