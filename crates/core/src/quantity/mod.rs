//! Quantity parsing for free-form numeric and textual input.
//!
//! - `parser` - single-value normalisation and token scanning
//! - `year` - calendar-year token heuristic for prose breakdowns
//!
//! Parsing never fails loudly: malformed input degrades to `None` (single
//! value) or to no tokens (free text).

pub mod parser;
pub mod year;

#[cfg(test)]
mod parser_props;

pub use parser::{
    QuantityToken, extract_tokens, parse_all_quantities, parse_all_quantities_at, parse_quantity,
    parse_quantity_or_zero, sum_quantities, sum_quantities_at,
};
pub use year::{YearContext, is_likely_year_token, looks_like_calendar_year};
