//! Helpers over [`serde_json::Value`], the cell type for columns and kwargs.
//!
//! Columns carry dynamically typed values with [`Value::Null`] as the missing
//! marker. These helpers centralize the comparisons and conversions that
//! individual expectations would otherwise reimplement inconsistently.

use serde_json::Value;
use std::cmp::Ordering;

/// Returns true if the value is the null marker.
pub fn is_null(value: &Value) -> bool {
    matches!(value, Value::Null)
}

/// The JSON type name of a value.
///
/// Integers (values stored as `i64`/`u64`) report `"integer"`; all other
/// numbers report `"number"`.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extracts a finite float from a numeric value.
pub fn as_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

/// Compares two values when a meaningful ordering exists.
///
/// Numbers compare with numbers and strings with strings; every other pairing
/// has no defined order and returns `None`, which range predicates treat as a
/// failed row rather than an error.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => as_f64(a)?.partial_cmp(&as_f64(b)?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// The length of a value, for the value-length expectations.
///
/// Strings measure in characters, arrays in elements. Other types have no
/// length.
pub fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// A canonical string key for set membership and duplicate detection.
///
/// `Value` is not `Hash`, so sets and frequency tables key on the compact JSON
/// rendering instead. Distinct JSON representations (`1` vs `1.0`) stay
/// distinct, consistent with `Value`'s own equality.
pub fn canonical_key(value: &Value) -> String {
    value.to_string()
}

/// Checks an optional closed lower and upper bound against a float.
///
/// Absent bounds are unconstrained.
pub fn within_bounds(x: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |m| m <= x) && max.map_or(true, |m| x <= m)
}
