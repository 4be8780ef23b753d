//! Normalization of "label → count" tuple lists (word and emoji frequencies).
//!
//! The analysis backend delivers these as JSON arrays of `[label, count]`
//! pairs, with no guarantee about shape or sign. Everything that reaches a
//! chart goes through `normalize_tuples` first.

use serde_json::Value;

/// Default cap applied when a chart does not request a tighter one.
pub const DEFAULT_TUPLE_LIMIT: usize = 40;

/// Filters a raw JSON value down to well-formed `(label, count)` pairs.
///
/// A pair survives when it is an array of at least two elements, the first
/// element is present and non-null, and the second parses to a finite number
/// strictly greater than zero. The result is truncated to `limit` and keeps
/// the original relative order; no re-sorting happens here.
pub fn normalize_tuples(value: &Value, limit: usize) -> Vec<(String, f64)> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|pair| {
            let pair = pair.as_array()?;
            if pair.len() < 2 {
                return None;
            }
            let label = tuple_label(&pair[0])?;
            let count = parse_count(&pair[1])?;
            if count > 0.0 {
                Some((label, count))
            } else {
                None
            }
        })
        .take(limit)
        .collect()
}

/// Sums the counts of an already-normalized tuple list.
///
/// Used to collapse a per-person emoji list into one scalar per person.
pub fn sum_tuple_list(tuples: &[(String, f64)]) -> f64 {
    tuples.iter().map(|(_, count)| count).sum()
}

fn tuple_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses a count, accepting numbers and numeric strings. Non-finite
/// values are treated as absent.
fn parse_count(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
