//! Fixed-point text form of FX rates.

/// Number of fractional digits kept when a rate is written as text.
pub const RATE_DECIMAL_PLACES: usize = 6;

/// Format a rate as fixed-point text, e.g. `56.123456`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.*}", RATE_DECIMAL_PLACES, rate)
}

/// Parse rate text, tolerating surrounding whitespace and quotes.
///
/// Returns `None` unless the text is a finite, strictly positive number.
pub fn parse_rate(text: &str) -> Option<f64> {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'');
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}
