//! Explicit numeric parsing for loosely typed client input.
//!
//! Clients send numbers either as JSON numbers or as numeric strings, and path
//! segments are always strings. Everything funnels through here so that a
//! malformed value is rejected instead of turning into a NaN somewhere deeper.

use serde_json::Value;

/// Parses a finite number from a string, ignoring surrounding whitespace.
pub fn parse(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    input.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Reads a finite number out of a JSON number or a numeric string.
pub fn from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(x) => x.as_f64().filter(|x| x.is_finite()),
        Value::String(x) => parse(x),
        _ => None,
    }
}

/// Rounds to the nearest integer with halves going towards positive infinity,
/// so `-85.5` becomes `-85` and `85.5` becomes `86`.
pub fn round(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Rounds and narrows to an `i32`, rejecting values that do not fit.
pub fn round_i32(x: f64) -> Option<i32> {
    let rounded = round(x);
    if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return None;
    }
    Some(rounded as i32)
}
