//! Property-based tests for quantity parsing.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::parser::{parse_quantity, sum_quantities_at};

/// Renders cents with `.` thousands and `,` decimals (es-MX spreadsheet style).
fn european(cents: i64) -> String {
    let int_part = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{grouped},{:02}", cents % 100)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Plain `1234.56` and grouped `1.234,56` renderings agree.
    #[test]
    fn prop_locale_renderings_agree(cents in 0i64..10_000_000_000) {
        let expected = Decimal::new(cents, 2);
        let plain = format!("{}.{:02}", cents / 100, cents % 100);

        prop_assert_eq!(parse_quantity(&plain), Some(expected));
        prop_assert_eq!(parse_quantity(&european(cents)), Some(expected));
    }

    /// Parsing never panics, whatever the input.
    #[test]
    fn prop_parse_never_panics(raw in "\\PC*") {
        let _ = parse_quantity(&raw);
        let _ = sum_quantities_at(&raw, 2026);
    }

    /// Small counts in prose always add up.
    #[test]
    fn prop_small_counts_sum(a in 0u32..1000, b in 0u32..1000) {
        let text = format!("se atendieron {a} personas y {b} familias");
        prop_assert_eq!(sum_quantities_at(&text, 2026), Decimal::from(a + b));
    }
}
