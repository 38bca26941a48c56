//! Canonicalisation of locale-ambiguous numeric input.
//!
//! Separator rules:
//! - both `,` and `.` present: the rightmost one is the decimal separator
//! - only `,`: decimal, unless several commas form exact thousands groups
//! - only `.`: thousands when it forms exact groups of three (`1.234.567`),
//!   decimal otherwise (`1234.56`, `0.500`)

use std::str::FromStr;

use chrono::{Datelike, Local};
use metas_shared::format::round_amount;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use super::year::{YearContext, is_likely_year_token};

static DOT_GROUPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9]\d{0,2}(\.\d{3})+$").expect("valid dot grouping regex"));
static COMMA_GROUPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9]\d{0,2}(,\d{3})+$").expect("valid comma grouping regex"));
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)*").expect("valid quantity token regex"));

/// A numeric token found in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityToken {
    /// Matched text, without sign.
    pub raw: String,
    /// Canonical value, negative when the token carried a leading `-`.
    pub value: Decimal,
    /// Byte offset where the digits start.
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
}

/// Parses a single free-form value such as `"$ 1.234,56"` or `"1,500.00 MXN"`.
///
/// Returns `None` on empty or non-numeric input.
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let sanitized: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let (negative, body) = match sanitized.strip_prefix('-') {
        Some(rest) => (true, rest.replace('-', "")),
        None => (false, sanitized.replace('-', "")),
    };
    if !body.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let value = Decimal::from_str(&normalize_separators(&body)).ok()?;
    Some(if negative { -value } else { value })
}

/// Like [`parse_quantity`], with unparseable input treated as zero.
#[must_use]
pub fn parse_quantity_or_zero(raw: &str) -> Decimal {
    parse_quantity(raw).unwrap_or(Decimal::ZERO)
}

fn normalize_separators(body: &str) -> String {
    match (body.contains(','), body.contains('.')) {
        (true, true) => {
            let decimal = if body.rfind(',') > body.rfind('.') { ',' } else { '.' };
            with_decimal_separator(body, Some(decimal))
        }
        (true, false) => {
            if body.matches(',').count() > 1 && COMMA_GROUPED_RE.is_match(body) {
                with_decimal_separator(body, None)
            } else {
                with_decimal_separator(body, Some(','))
            }
        }
        (false, true) => {
            if DOT_GROUPED_RE.is_match(body) {
                with_decimal_separator(body, None)
            } else {
                with_decimal_separator(body, Some('.'))
            }
        }
        (false, false) => with_decimal_separator(body, None),
    }
}

/// Keeps digits plus the last occurrence of `decimal` (rewritten as `.`).
fn with_decimal_separator(body: &str, decimal: Option<char>) -> String {
    let split_at = decimal.and_then(|sep| body.rfind(sep));
    let mut out = String::with_capacity(body.len() + 1);
    for (i, ch) in body.char_indices() {
        if ch.is_ascii_digit() {
            out.push(ch);
        } else if Some(i) == split_at {
            out.push('.');
        }
    }
    if out.starts_with('.') {
        out.insert(0, '0');
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

/// Scans free text for every numeric token, in order of appearance.
///
/// A `-` directly before the digits makes the token negative only when it is
/// not glued to a preceding word or number (`2024-2025` is two positive tokens).
#[must_use]
pub fn extract_tokens(raw: &str) -> Vec<QuantityToken> {
    TOKEN_RE
        .find_iter(raw)
        .filter_map(|m| {
            let value = parse_quantity(m.as_str())?;
            let negative = is_sign_prefix(&raw[..m.start()]);
            Some(QuantityToken {
                raw: m.as_str().to_string(),
                value: if negative { -value } else { value },
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

fn is_sign_prefix(before: &str) -> bool {
    let mut rev = before.chars().rev();
    match rev.next() {
        Some('-') => rev.next().is_none_or(|c| !c.is_alphanumeric()),
        _ => false,
    }
}

/// Extracts every quantity from free text, excluding calendar-year tokens.
#[must_use]
pub fn parse_all_quantities(raw: &str) -> Vec<Decimal> {
    parse_all_quantities_at(raw, Local::now().year())
}

/// [`parse_all_quantities`] with an explicit reference year.
///
/// When the year rule would drop every token, all tokens are kept.
#[must_use]
pub fn parse_all_quantities_at(raw: &str, current_year: i32) -> Vec<Decimal> {
    let tokens = extract_tokens(raw);
    let token_count = tokens.len();

    let kept: Vec<Decimal> = tokens
        .iter()
        .enumerate()
        .filter(|(index, token)| {
            let ctx = YearContext {
                text: raw,
                index: *index,
                token_count,
                current_year,
            };
            !is_likely_year_token(token, &ctx)
        })
        .map(|(_, token)| token.value)
        .collect();

    if kept.is_empty() {
        tokens.into_iter().map(|token| token.value).collect()
    } else {
        kept
    }
}

/// Sums every quantity in free text, rounded to two decimals. Zero when none.
#[must_use]
pub fn sum_quantities(raw: &str) -> Decimal {
    sum_quantities_at(raw, Local::now().year())
}

/// [`sum_quantities`] with an explicit reference year.
#[must_use]
pub fn sum_quantities_at(raw: &str, current_year: i32) -> Decimal {
    let total = parse_all_quantities_at(raw, current_year)
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add);
    round_amount(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    const YEAR: i32 = 2026;

    #[rstest]
    #[case("1.234,56", dec!(1234.56))]
    #[case("1234.56", dec!(1234.56))]
    #[case("1,234.56", dec!(1234.56))]
    #[case("$ 1.234.567,89", dec!(1234567.89))]
    #[case("1.500", dec!(1500))]
    #[case("12.345.678", dec!(12345678))]
    #[case("0.500", dec!(0.5))]
    #[case("1.5", dec!(1.5))]
    #[case("1,5", dec!(1.5))]
    #[case("1,234", dec!(1.234))]
    #[case("1,234,567", dec!(1234567))]
    #[case("-250", dec!(-250))]
    #[case("$\u{a0}3\u{a0}500,00 MXN", dec!(3500.00))]
    #[case(".75", dec!(0.75))]
    #[case("40.", dec!(40))]
    fn test_parse_quantity(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_quantity(raw), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("$")]
    #[case("-")]
    #[case(",.")]
    #[case("99999999999999999999999999999999999")]
    fn test_parse_quantity_rejects(#[case] raw: &str) {
        assert_eq!(parse_quantity(raw), None);
    }

    #[test]
    fn test_parse_quantity_or_zero() {
        assert_eq!(parse_quantity_or_zero("n/a"), Decimal::ZERO);
        assert_eq!(parse_quantity_or_zero("12"), dec!(12));
    }

    #[test]
    fn test_extract_tokens_positions() {
        let tokens = extract_tokens("Se dieron 10 talleres y 1.250,5 horas");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].raw, "10");
        assert_eq!(tokens[0].value, dec!(10));
        assert_eq!(tokens[1].raw, "1.250,5");
        assert_eq!(tokens[1].value, dec!(1250.5));
        assert_eq!(&"Se dieron 10 talleres y 1.250,5 horas"[tokens[1].start..tokens[1].end], "1.250,5");
    }

    #[test]
    fn test_extract_tokens_sign_handling() {
        let tokens = extract_tokens("ajuste -5 piezas, rango 2024-2025");
        let values: Vec<Decimal> = tokens.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![dec!(-5), dec!(2024), dec!(2025)]);
    }

    #[test]
    fn test_sum_excludes_trailing_year() {
        assert_eq!(
            sum_quantities_at("Se entregaron 10 y 15 informes durante 2025", YEAR),
            dec!(25)
        );
    }

    #[test]
    fn test_sum_excludes_year_near_period_word() {
        assert_eq!(
            sum_quantities_at("durante 2025 se entregaron 40 informes", YEAR),
            dec!(40)
        );
    }

    #[test]
    fn test_sum_excludes_year_followed_by_period_word() {
        assert_eq!(sum_quantities_at("2025 año: 40 informes", YEAR), dec!(40));
    }

    #[test]
    fn test_year_only_text_falls_back_to_all_tokens() {
        assert_eq!(parse_all_quantities_at("durante 2025", YEAR), vec![dec!(2025)]);
        assert_eq!(sum_quantities_at("2025", YEAR), dec!(2025));
    }

    #[test]
    fn test_year_like_quantity_mid_sentence_is_kept() {
        // Four digits, in range, not last and no period word nearby.
        assert_eq!(
            sum_quantities_at("Se visitaron 2030 hogares y 5 escuelas", YEAR),
            dec!(2035)
        );
    }

    #[test]
    fn test_sum_rounds_to_two_decimals() {
        assert_eq!(sum_quantities_at("0,333 y 0,333 litros", YEAR), dec!(0.67));
    }

    #[test]
    fn test_sum_without_tokens_is_zero() {
        assert_eq!(sum_quantities_at("sin avances", YEAR), Decimal::ZERO);
        assert_eq!(sum_quantities_at("", YEAR), Decimal::ZERO);
    }
}
