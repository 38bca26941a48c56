//! Final save gate combining distribution and ceiling checks.

use metas_shared::AppError;
use thiserror::Error;
use tracing::{debug, warn};

use crate::distribution::{ActivityDraft, ActivitySavePayload, DistributionError, DistributionValidator};
use crate::ledger::{CeilingError, CommitmentRollup, LedgerFetchError, RollupState, validate_against_ceiling};

/// Reasons an activity cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The bimester distribution is inconsistent.
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// The budget does not fit the area ceiling.
    #[error(transparent)]
    Ceiling(#[from] CeilingError),
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Distribution(e) => Self::Validation(e.to_string()),
            ReconcileError::Ceiling(e) => Self::BusinessRule(e.to_string()),
        }
    }
}

impl From<LedgerFetchError> for AppError {
    fn from(err: LedgerFetchError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

/// Stateless gate run immediately before an activity is persisted.
pub struct SaveGate;

impl SaveGate {
    /// Checks a draft and returns the payload to persist.
    ///
    /// Distribution checks always run first. The ceiling check runs only when
    /// the resolver holds a rollup for the draft's own area and fiscal year;
    /// otherwise availability is unknown and only the sum invariants apply.
    ///
    /// # Errors
    ///
    /// Returns the first distribution or ceiling violation.
    pub fn check(draft: &ActivityDraft, ledger: &RollupState) -> Result<ActivitySavePayload, ReconcileError> {
        let payload = DistributionValidator::build_save_payload(draft)?;

        match Self::applicable_rollup(draft, ledger) {
            Some(rollup) => {
                if let Some(date) = draft.effective_start_date
                    && !rollup.ceiling.snapshot.is_valid_on(date)
                {
                    warn!(
                        area_id = %rollup.ceiling.area_id,
                        %date,
                        version = rollup.ceiling.snapshot.version,
                        "Effective date falls outside the ceiling's validity window"
                    );
                }
                validate_against_ceiling(rollup, draft.total_budget)?;
            }
            None => debug!(
                area_id = ?draft.area_id,
                year = ?draft.fiscal_year(),
                "Area availability unknown; ceiling check skipped"
            ),
        }

        Ok(payload)
    }

    fn applicable_rollup<'a>(draft: &ActivityDraft, ledger: &'a RollupState) -> Option<&'a CommitmentRollup> {
        let rollup = ledger.rollup()?;
        let area_id = draft.area_id?;
        let year = draft.fiscal_year()?;
        rollup.matches(area_id, year).then_some(rollup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Bimester, RawAllocationInput};
    use crate::ledger::{CeilingSnapshot, CeilingStatus, LedgerQuery, LedgerResponse};
    use chrono::NaiveDate;
    use metas_shared::types::{AreaId, Currency};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn draft(area_id: AreaId, total: &str, per_period: &str) -> ActivityDraft {
        let mut draft = ActivityDraft::new();
        draft.area_id = Some(area_id);
        draft.effective_start_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        draft.set_total_budget_raw(total);
        draft.set_total_target_raw("60");
        for bimester in Bimester::ALL {
            draft.set_allocation_raw(
                bimester,
                &RawAllocationInput {
                    budget: per_period.to_string(),
                    target: "10".to_string(),
                    breakdown_text: "5 talleres y 5 visitas".to_string(),
                },
            );
        }
        draft
    }

    fn ready(area_id: AreaId, year: i32, total: Decimal, committed: Decimal, draft: Decimal) -> RollupState {
        let response = LedgerResponse {
            ceiling: CeilingSnapshot {
                total,
                version: 1,
                valid_from: NaiveDate::from_ymd_opt(2026, 1, 1),
                valid_to: None,
                status: CeilingStatus::Approved,
                currency: Currency::Mxn,
            },
            committed,
            available: total - committed,
        };
        let query = LedgerQuery {
            area_id,
            year,
            draft_budget: draft,
            activity_id: None,
        };
        RollupState::Ready(Arc::new(response.into_rollup(&query)))
    }

    #[test]
    fn test_balanced_draft_saves_without_rollup() {
        let area = AreaId::new();
        let payload = SaveGate::check(&draft(area, "$ 1.200", "200"), &RollupState::Unknown).unwrap();

        assert_eq!(payload.total_budget, dec!(1200));
        assert_eq!(payload.area_id, Some(area));
        assert_eq!(payload.bimestres.len(), 6);
        assert!(payload.bimestres.iter().all(|p| p.breakdown_quantity_total == dec!(10)));
    }

    #[test]
    fn test_balanced_draft_within_ceiling() {
        let area = AreaId::new();
        let ledger = ready(area, 2026, dec!(5000), dec!(3000), dec!(1200));
        assert!(SaveGate::check(&draft(area, "1200", "200"), &ledger).is_ok());
    }

    #[test]
    fn test_ceiling_exceeded_blocks_save() {
        let area = AreaId::new();
        let ledger = ready(area, 2026, dec!(1000), dec!(900), dec!(150));
        let err = SaveGate::check(&draft(area, "150", "25"), &ledger).unwrap_err();

        let ReconcileError::Ceiling(CeilingError::ExceedsAvailable { excess, .. }) = &err else {
            panic!("expected ExceedsAvailable, got {err:?}");
        };
        assert_eq!(excess.amount, dec!(50));

        let app: AppError = err.into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");
        assert!(app.to_string().contains("exceeds available balance by $50.00"));
    }

    #[test]
    fn test_distribution_checked_before_ceiling() {
        let area = AreaId::new();
        let ledger = ready(area, 2026, dec!(1000), dec!(1000), dec!(0));
        let err = SaveGate::check(&draft(area, "1250", "200"), &ledger).unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Distribution(DistributionError::BudgetMismatch { .. })
        ));
        assert_eq!(AppError::from(err).error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_rollup_for_other_area_is_ignored() {
        let ledger = ready(AreaId::new(), 2026, dec!(100), dec!(100), dec!(0));
        assert!(SaveGate::check(&draft(AreaId::new(), "1200", "200"), &ledger).is_ok());
    }

    #[test]
    fn test_rollup_for_other_year_is_ignored() {
        let area = AreaId::new();
        let ledger = ready(area, 2025, dec!(100), dec!(100), dec!(0));
        assert!(SaveGate::check(&draft(area, "1200", "200"), &ledger).is_ok());
    }

    #[test]
    fn test_fetch_error_maps_to_external_service() {
        let app: AppError = LedgerFetchError::Transport("connection refused".into()).into();
        assert_eq!(app.error_code(), "EXTERNAL_SERVICE_ERROR");
        assert!(!app.is_user_correctable());
    }
}
