//! Calendar-year detection for numeric tokens in prose.
//!
//! A sentence like "durante 2025 se entregaron 40 informes" must count 40,
//! not 2065. The rule is deliberately narrow and can still misfire on a
//! genuine four-digit count written next to a period word.

use super::parser::QuantityToken;

/// Earliest year considered a calendar year.
pub const YEAR_FLOOR: i32 = 1900;

/// How far past the current year a token may still be a calendar year.
pub const YEAR_LOOKAHEAD: i32 = 10;

/// Number of words before a token inspected for year/period vocabulary.
const WORDS_BEFORE: usize = 2;

/// Number of words after a token inspected for year/period vocabulary.
const WORDS_AFTER: usize = 1;

const YEAR_LEXICON: &[&str] = &[
    // es
    "año", "años", "anio", "anios", "ejercicio", "ejercicios", "periodo", "período", "periodos",
    "períodos", "durante", "bimestre", "bimestres", "trimestre", "trimestres", "semestre",
    "semestres", "mes", "meses", "fiscal", "cierre", "corte", "vigencia", "enero", "febrero",
    "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre", "setiembre", "octubre",
    "noviembre", "diciembre",
    // en
    "year", "years", "during", "period", "periods", "month", "months", "january", "february",
    "march", "april", "may", "june", "july", "august", "september", "october", "november",
    "december",
];

/// Position of a token within the text it was scanned from.
#[derive(Debug, Clone, Copy)]
pub struct YearContext<'a> {
    /// The full scanned text.
    pub text: &'a str,
    /// Zero-based position of the token among all tokens.
    pub index: usize,
    /// Total number of tokens found in `text`.
    pub token_count: usize,
    /// Reference year for the upper bound.
    pub current_year: i32,
}

/// Returns true when `raw` is exactly four digits between 1900 and
/// `current_year + 10`.
#[must_use]
pub fn looks_like_calendar_year(raw: &str, current_year: i32) -> bool {
    raw.len() == 4
        && raw.bytes().all(|b| b.is_ascii_digit())
        && raw
            .parse::<i32>()
            .is_ok_and(|year| (YEAR_FLOOR..=current_year + YEAR_LOOKAHEAD).contains(&year))
}

/// Decides whether a token should be excluded from quantity totals.
///
/// A calendar-year-shaped token is excluded when it is the last token of a
/// multi-token scan, when one of the two preceding words is year/period
/// vocabulary, or when the word right after it is.
#[must_use]
pub fn is_likely_year_token(token: &QuantityToken, ctx: &YearContext<'_>) -> bool {
    if token.value.is_sign_negative() || !looks_like_calendar_year(&token.raw, ctx.current_year) {
        return false;
    }
    let last_of_many = ctx.token_count > 1 && ctx.index + 1 == ctx.token_count;
    last_of_many
        || has_period_word_before(ctx.text, token.start)
        || has_period_word_after(ctx.text, token.end)
}

fn has_period_word_before(text: &str, start: usize) -> bool {
    words(text.get(..start).unwrap_or_default())
        .rev()
        .take(WORDS_BEFORE)
        .any(is_period_word)
}

fn has_period_word_after(text: &str, end: usize) -> bool {
    words(text.get(end..).unwrap_or_default())
        .take(WORDS_AFTER)
        .any(is_period_word)
}

fn words(text: &str) -> impl DoubleEndedIterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|word| !word.is_empty())
}

fn is_period_word(word: &str) -> bool {
    YEAR_LEXICON.contains(&word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::parser::extract_tokens;

    fn ctx(text: &str, index: usize, token_count: usize) -> YearContext<'_> {
        YearContext {
            text,
            index,
            token_count,
            current_year: 2026,
        }
    }

    #[test]
    fn test_calendar_year_bounds() {
        assert!(looks_like_calendar_year("1900", 2026));
        assert!(looks_like_calendar_year("2036", 2026));
        assert!(!looks_like_calendar_year("2037", 2026));
        assert!(!looks_like_calendar_year("1899", 2026));
        assert!(!looks_like_calendar_year("2.025", 2026));
        assert!(!looks_like_calendar_year("20250", 2026));
    }

    #[test]
    fn test_last_token_of_many_is_year() {
        let text = "5 cursos 2024";
        let tokens = extract_tokens(text);
        assert!(is_likely_year_token(&tokens[1], &ctx(text, 1, 2)));
        assert!(!is_likely_year_token(&tokens[0], &ctx(text, 0, 2)));
    }

    #[test]
    fn test_single_token_without_lexicon_is_not_year() {
        let text = "2024";
        let tokens = extract_tokens(text);
        assert!(!is_likely_year_token(&tokens[0], &ctx(text, 0, 1)));
    }

    #[test]
    fn test_lexicon_match_is_case_insensitive() {
        let text = "En el AÑO 2024 hubo 3 ferias";
        let tokens = extract_tokens(text);
        assert!(is_likely_year_token(&tokens[0], &ctx(text, 0, 2)));
    }

    #[test]
    fn test_lexicon_window_is_two_words() {
        let text = "durante las jornadas 2024 y 3 ferias";
        let tokens = extract_tokens(text);
        assert!(!is_likely_year_token(&tokens[0], &ctx(text, 0, 2)));
    }

    #[test]
    fn test_period_word_right_after_token() {
        let text = "2025 año: 40 informes";
        let tokens = extract_tokens(text);
        assert!(is_likely_year_token(&tokens[0], &ctx(text, 0, 2)));

        let text = "2024 fiscal, 3 ferias";
        let tokens = extract_tokens(text);
        assert!(is_likely_year_token(&tokens[0], &ctx(text, 0, 2)));
    }

    #[test]
    fn test_following_window_is_one_word() {
        let text = "2024 nuevos meses y 3 ferias";
        let tokens = extract_tokens(text);
        assert!(!is_likely_year_token(&tokens[0], &ctx(text, 0, 2)));
    }
}
