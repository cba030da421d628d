//! Row of the all-websites dashboard.

use serde::{Deserialize, Serialize};

/// Totals for one website in the multi-site summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummaryRow {
    pub idsite: u32,
    pub visits: String,
    pub pageviews: String,
    pub revenue: String,
    pub name: String,
    pub url: String,
    pub visits_summary_value: f64,
    pub pageviews_summary_value: f64,
    pub revenue_summary_value: f64,
}

impl SiteSummaryRow {
    /// Build a row from the raw strings rendered by the report.
    ///
    /// Summary values are parsed leniently from their numeric prefix. Visits
    /// and pageviews that do not parse become NaN, revenue becomes 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        idsite: u32,
        visits: impl Into<String>,
        pageviews: impl Into<String>,
        revenue: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        visits_summary: &str,
        pageviews_summary: &str,
        revenue_summary: &str,
    ) -> Self {
        Self {
            idsite,
            visits: visits.into(),
            pageviews: pageviews.into(),
            revenue: revenue.into(),
            name: name.into(),
            url: url.into(),
            visits_summary_value: parse_float_prefix(visits_summary).unwrap_or(f64::NAN),
            pageviews_summary_value: parse_float_prefix(pageviews_summary).unwrap_or(f64::NAN),
            revenue_summary_value: parse_float_prefix(revenue_summary).unwrap_or(0.0),
        }
    }
}

/// Parse the longest leading decimal number, ignoring leading whitespace.
///
/// `"12.5%"` yields 12.5, `"-3e2 visits"` yields -300, `"abc"` yields `None`.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_prefixes() {
        assert_eq!(parse_float_prefix("12.5%"), Some(12.5));
        assert_eq!(parse_float_prefix("  -3e2 visits"), Some(-300.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn unparseable_revenue_defaults_to_zero() {
        let row = SiteSummaryRow::new(
            3,
            "1,204",
            "3,410",
            "-",
            "Shop",
            "https://shop.example",
            "12.5",
            "n/a",
            "-",
        );
        assert_eq!(row.visits_summary_value, 12.5);
        assert!(row.pageviews_summary_value.is_nan());
        assert_eq!(row.revenue_summary_value, 0.0);
        assert_eq!(row.name, "Shop");
    }
}
