//! Numeric formatting helpers and the shared rounding policy.
//!
//! Every reconciliation check in the workspace compares against [`TOLERANCE`];
//! never re-literal `0.01` elsewhere.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Absolute tolerance for sum and breakdown checks (two-decimal precision).
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places kept for amounts and quantities.
pub const AMOUNT_DECIMALS: u32 = 2;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const FIFTY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Rounds to two decimals, midpoint away from zero.
#[must_use]
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true when `a` and `b` differ by strictly less than [`TOLERANCE`].
///
/// The difference saturates, so operands at opposite `Decimal` bounds compare as far apart.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.saturating_sub(b).abs() < TOLERANCE
}

/// Renders `value` with thousands grouping and a fixed number of decimals.
///
/// `format_grouped(dec!(-1234567.5), 2)` yields `-1,234,567.50`.
#[must_use]
pub fn format_grouped(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let precision = decimals as usize;
    let text = format!("{:.precision$}", rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Renders a plain quantity: grouped, at most two decimals, no trailing zeros.
#[must_use]
pub fn format_number(value: Decimal) -> String {
    let normalized = round_amount(value).normalize();
    format_grouped(normalized, normalized.scale())
}

/// Computes `part / whole * 100`, rounded to two decimals. Zero when `whole` is zero.
#[must_use]
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
        .map_or(Decimal::ZERO, round_amount)
}

/// Traffic-light status used by summary displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semaphore {
    /// Balanced or complete.
    Green,
    /// Short of the expected value.
    Yellow,
    /// Over the expected value, or far short of it.
    Red,
}

impl Semaphore {
    /// Classifies a reconciliation difference (`allocated - declared`).
    #[must_use]
    pub fn for_diff(diff: Decimal) -> Self {
        if within_tolerance(diff, Decimal::ZERO) {
            Self::Green
        } else if diff.is_sign_negative() {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    /// Classifies progress of `achieved` against `planned`.
    ///
    /// Nothing planned is always green.
    #[must_use]
    pub fn for_progress(achieved: Decimal, planned: Decimal) -> Self {
        if planned <= Decimal::ZERO {
            return Self::Green;
        }
        let pct = percentage(achieved, planned);
        if pct >= ONE_HUNDRED - TOLERANCE {
            Self::Green
        } else if pct >= FIFTY {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_value() {
        assert_eq!(TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_round_amount_midpoint_away_from_zero() {
        assert_eq!(round_amount(dec!(2.345)), dec!(2.35));
        assert_eq!(round_amount(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_amount(dec!(10)), dec!(10));
    }

    #[test]
    fn test_within_tolerance_is_strict() {
        assert!(within_tolerance(dec!(100), dec!(100.009)));
        assert!(!within_tolerance(dec!(100), dec!(100.01)));
    }

    #[test]
    fn test_within_tolerance_at_decimal_bounds() {
        assert!(within_tolerance(Decimal::MAX, Decimal::MAX));
        assert!(!within_tolerance(Decimal::MAX, Decimal::MIN));
        assert!(!within_tolerance(Decimal::MIN, Decimal::MAX));
    }

    #[rstest]
    #[case(dec!(0), 2, "0.00")]
    #[case(dec!(999), 2, "999.00")]
    #[case(dec!(1000), 2, "1,000.00")]
    #[case(dec!(1234567.5), 2, "1,234,567.50")]
    #[case(dec!(-1234.567), 2, "-1,234.57")]
    #[case(dec!(-0.001), 2, "0.00")]
    #[case(dec!(123456), 0, "123,456")]
    fn test_format_grouped(#[case] value: Decimal, #[case] decimals: u32, #[case] expected: &str) {
        assert_eq!(format_grouped(value, decimals), expected);
    }

    #[rstest]
    #[case(dec!(40), "40")]
    #[case(dec!(40.00), "40")]
    #[case(dec!(1234.5), "1,234.5")]
    #[case(dec!(0.125), "0.13")]
    #[case(dec!(-50), "-50")]
    fn test_format_number(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec!(50), dec!(200)), dec!(25));
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(percentage(dec!(5), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_semaphore_for_diff() {
        assert_eq!(Semaphore::for_diff(dec!(0.004)), Semaphore::Green);
        assert_eq!(Semaphore::for_diff(dec!(-50)), Semaphore::Yellow);
        assert_eq!(Semaphore::for_diff(dec!(0.02)), Semaphore::Red);
        assert_eq!(Semaphore::for_diff(dec!(-0.01)), Semaphore::Yellow);
        assert_eq!(Semaphore::for_diff(dec!(-0.009)), Semaphore::Green);
        assert_eq!(Semaphore::for_diff(Decimal::MIN), Semaphore::Yellow);
    }

    #[test]
    fn test_semaphore_for_progress() {
        assert_eq!(Semaphore::for_progress(dec!(10), dec!(10)), Semaphore::Green);
        assert_eq!(Semaphore::for_progress(dec!(6), dec!(10)), Semaphore::Yellow);
        assert_eq!(Semaphore::for_progress(dec!(2), dec!(10)), Semaphore::Red);
        assert_eq!(Semaphore::for_progress(dec!(0), dec!(0)), Semaphore::Green);
    }
}
