//! Distribution validation errors.

use metas_shared::format::format_number;
use metas_shared::types::Money;
use rust_decimal::Decimal;
use thiserror::Error;

use super::summary::DiffStatus;
use super::types::Bimester;

/// Which value of an activity or period a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    /// The budget amount.
    Budget,
    /// The target quantity.
    Target,
}

impl std::fmt::Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Budget => write!(f, "budget"),
            Self::Target => write!(f, "target"),
        }
    }
}

fn plain(value: &Decimal) -> String {
    format_number(*value)
}

/// Errors raised by the save-time distribution check.
///
/// Variants are listed in the order the check runs; only the first violation
/// is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// The activity does not carry exactly six periods.
    #[error("Activity must have exactly 6 bimesters, found {found}")]
    WrongPeriodCount {
        /// Number of periods present.
        found: usize,
    },

    /// A period appears more than once.
    #[error("{bimester} appears more than once")]
    DuplicatePeriod {
        /// The repeated period.
        bimester: Bimester,
    },

    /// A declared total is negative.
    #[error("Activity {field} cannot be negative ({})", plain(.value))]
    NegativeTotal {
        /// Which total.
        field: AmountField,
        /// The offending value.
        value: Decimal,
    },

    /// A period value is negative.
    #[error("The {field} for {bimester} cannot be negative ({})", plain(.value))]
    NegativeAllocation {
        /// The offending period.
        bimester: Bimester,
        /// Which value.
        field: AmountField,
        /// The offending value.
        value: Decimal,
    },

    /// Period budgets do not add up to the declared budget.
    #[error(
        "Bimester budgets add up to {allocated} but the activity budget is {declared} ({status} by {difference})"
    )]
    BudgetMismatch {
        /// Sum of period budgets.
        allocated: Money,
        /// Declared activity budget.
        declared: Money,
        /// Absolute difference.
        difference: Money,
        /// Whether the periods fall short or go over.
        status: DiffStatus,
    },

    /// Period targets do not add up to the declared target.
    #[error(
        "Bimester targets add up to {} but the activity target is {} ({status} by {})",
        plain(.allocated),
        plain(.declared),
        plain(.difference)
    )]
    TargetMismatch {
        /// Sum of period targets.
        allocated: Decimal,
        /// Declared activity target.
        declared: Decimal,
        /// Absolute difference.
        difference: Decimal,
        /// Whether the periods fall short or go over.
        status: DiffStatus,
    },

    /// A period with no target describes a positive quantity.
    #[error("The breakdown for {bimester} describes {} but its target is 0", plain(.described))]
    ZeroTargetBreakdown {
        /// The offending period.
        bimester: Bimester,
        /// Quantity extracted from the breakdown text.
        described: Decimal,
    },

    /// A period breakdown describes more than its target.
    #[error(
        "The breakdown for {bimester} describes {} which exceeds its target of {} by {}",
        plain(.described),
        plain(.target),
        plain(.excess)
    )]
    BreakdownExceedsTarget {
        /// The offending period.
        bimester: Bimester,
        /// Quantity extracted from the breakdown text.
        described: Decimal,
        /// The period target.
        target: Decimal,
        /// `described - target`.
        excess: Decimal,
    },
}

impl DistributionError {
    /// The period the error is attached to, when it concerns a single one.
    #[must_use]
    pub const fn bimester(&self) -> Option<Bimester> {
        match self {
            Self::DuplicatePeriod { bimester }
            | Self::NegativeAllocation { bimester, .. }
            | Self::ZeroTargetBreakdown { bimester, .. }
            | Self::BreakdownExceedsTarget { bimester, .. } => Some(*bimester),
            _ => None,
        }
    }
}
