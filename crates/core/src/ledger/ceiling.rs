//! Draft budget versus area ceiling.

use rust_decimal::Decimal;

use super::error::CeilingError;
use super::types::CommitmentRollup;

/// Checks a draft budget against an area's commitment rollup.
///
/// Only a positive draft budget is checked; a zero budget never consumes
/// ceiling. The checks run in order and the first failure is returned:
///
/// 1. the ceiling total must be positive
/// 2. something must be left under the ceiling
/// 3. the draft must fit in what is left
///
/// # Errors
///
/// Returns the first `CeilingError` that applies.
pub fn validate_against_ceiling(
    rollup: &CommitmentRollup,
    draft_budget: Decimal,
) -> Result<(), CeilingError> {
    if draft_budget <= Decimal::ZERO {
        return Ok(());
    }

    if rollup.total_ceiling <= Decimal::ZERO {
        return Err(CeilingError::NoCeilingConfigured {
            year: rollup.ceiling.fiscal_year,
        });
    }

    if rollup.available <= Decimal::ZERO {
        return Err(CeilingError::CeilingFullyCommitted {
            ceiling: rollup.money(rollup.total_ceiling),
            available: rollup.money(rollup.available),
        });
    }

    let after = rollup.available - draft_budget;
    if after < Decimal::ZERO {
        return Err(CeilingError::ExceedsAvailable {
            draft: rollup.money(draft_budget),
            available: rollup.money(rollup.available),
            excess: rollup.money(-after),
        });
    }

    Ok(())
}
