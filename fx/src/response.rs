//! Decoding of rate API response bodies.
//!
//! Each supported API answers with a different JSON shape. The body is parsed
//! once and handed to an ordered list of decoders; the first positive rate wins.

use fxgate_common::{parse_rate, Currency};
use serde_json::Value;

/// A pure attempt at pulling a rate for `to` out of a response body.
type ShapeDecoder = fn(&Value, &Currency) -> Option<f64>;

/// Known response shapes, in the order they are tried.
const DECODERS: [(&str, ShapeDecoder); 4] = [
    ("result", decode_result),
    ("rates-string", decode_rates_string),
    ("rates-number", decode_rates_number),
    ("conversion_rates", decode_conversion_rates),
];

/// `{"success": true, "result": 56.78}`
fn decode_result(body: &Value, _to: &Currency) -> Option<f64> {
    body.get("result")?.as_f64()
}

/// `{"rates": {"ETB": "56.78"}}`
fn decode_rates_string(body: &Value, to: &Currency) -> Option<f64> {
    body.get("rates")?.get(to.code())?.as_str().and_then(parse_rate)
}

/// `{"rates": {"ETB": 56.78}}`
fn decode_rates_number(body: &Value, to: &Currency) -> Option<f64> {
    body.get("rates")?.get(to.code())?.as_f64()
}

/// `{"conversion_rates": {"ETB": 56.78}}`
fn decode_conversion_rates(body: &Value, to: &Currency) -> Option<f64> {
    body.get("conversion_rates")?.get(to.code())?.as_f64()
}

/// Extract the rate for `to` from a raw response body.
///
/// Returns the matching shape name alongside the rate. Zero, negative and
/// non-finite values count as "no match".
pub fn extract_rate(body: &[u8], to: &Currency) -> Option<(&'static str, f64)> {
    let value: Value = serde_json::from_slice(body).ok()?;

    DECODERS.iter().find_map(|(shape, decode)| {
        decode(&value, to)
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map(|rate| (*shape, rate))
    })
}
