//! Numeric cell normalizers for the delivery metrics export
//!
//! The spreadsheet mixes currency strings (`"$12,345.67"`), percentages
//! (`"85%"`) and decimal-formatted counts (`"3.00"`). Every function here is
//! total: blank cells, missing columns and unparseable garbage all collapse
//! to `None`.

use once_cell::sync::Lazy;
use regex::Regex;

static CURRENCY_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[$,\s"']"#).unwrap());
static PERCENT_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[%\s]").unwrap());

/// Parse a currency-like cell into a decimal value.
///
/// Strips currency symbols, thousands separators, quotes and whitespace
/// before parsing. Returns `None` for blank or unparseable input.
pub fn clean_currency(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned = CURRENCY_JUNK.replace_all(raw, "");
    cleaned.parse::<f64>().ok()
}

/// Parse a percentage cell, keeping the value in percentage points
/// (`"85%"` -> `85.0`).
pub fn clean_percentage(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned = PERCENT_JUNK.replace_all(raw, "");
    cleaned.parse::<f64>().ok()
}

/// Parse an integer count cell. Goes through float first so that
/// decimal-formatted exports like `"3.00"` still yield `3`.
pub fn clean_count(value: Option<&str>) -> Option<i64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().map(|f| f.trunc() as i64)
}

/// Gross margin percentage: `(revenue - cost) / revenue * 100`, rounded to
/// two decimals.
///
/// Requires revenue to be present and strictly positive, and cost to be
/// present. A cost of exactly zero is a valid observation (GM = 100.00), not
/// missing data. Everything else yields 0.
pub fn gross_margin(revenue: Option<f64>, cost: Option<f64>) -> f64 {
    match (revenue, cost) {
        (Some(rev), Some(cost)) if rev > 0.0 => round2((rev - cost) / rev * 100.0),
        _ => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_with_symbols_and_separators() {
        assert_eq!(clean_currency(Some("$12,345.67")), Some(12345.67));
        assert_eq!(clean_currency(Some("\"1,000\"")), Some(1000.0));
        assert_eq!(clean_currency(Some("  250 ")), Some(250.0));
    }

    #[test]
    fn test_currency_blank_and_garbage() {
        assert_eq!(clean_currency(None), None);
        assert_eq!(clean_currency(Some("")), None);
        assert_eq!(clean_currency(Some("   ")), None);
        assert_eq!(clean_currency(Some("n/a")), None);
    }

    #[test]
    fn test_percentage_stays_in_points() {
        assert_eq!(clean_percentage(Some("85%")), Some(85.0));
        assert_eq!(clean_percentage(Some(" 72.5 % ")), Some(72.5));
        assert_eq!(clean_percentage(Some("")), None);
        assert_eq!(clean_percentage(Some("high")), None);
    }

    #[test]
    fn test_count_tolerates_decimal_formatting() {
        assert_eq!(clean_count(Some("3.00")), Some(3));
        assert_eq!(clean_count(Some("12")), Some(12));
        assert_eq!(clean_count(Some("7.9")), Some(7));
        assert_eq!(clean_count(None), None);
        assert_eq!(clean_count(Some(" ")), None);
        assert_eq!(clean_count(Some("three")), None);
    }

    #[test]
    fn test_gross_margin_basic() {
        assert_eq!(gross_margin(Some(1000.0), Some(800.0)), 20.0);
        assert_eq!(gross_margin(Some(3.0), Some(1.0)), 66.67);
    }

    #[test]
    fn test_gross_margin_requires_positive_revenue_and_present_cost() {
        assert_eq!(gross_margin(Some(0.0), Some(100.0)), 0.0);
        assert_eq!(gross_margin(Some(1000.0), None), 0.0);
        assert_eq!(gross_margin(None, Some(100.0)), 0.0);
    }

    #[test]
    fn test_gross_margin_zero_cost_is_a_real_value() {
        assert_eq!(gross_margin(Some(1000.0), Some(0.0)), 100.0);
    }
}
