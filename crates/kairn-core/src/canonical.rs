//! Canonical JSON encoding.
//!
//! Every hash over structured data is computed from this encoding, never from
//! ad hoc serialization. The rules:
//!
//! - object keys are sorted by their JSON-encoded form (byte order)
//! - arrays keep their input order
//! - strings use standard JSON escaping
//! - no insignificant whitespace
//! - floats with no fractional part are written as integers, so `1` and
//!   `1.0` encode identically

use serde::Serialize;
use serde_json::{Number, Value};

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Canonicalize any serializable value.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON (for example a
/// map with non-string keys).
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    Ok(canonicalize_value(&value))
}

/// Canonicalize pre-encoded JSON bytes.
///
/// # Errors
///
/// Returns an error if `bytes` is not a single valid JSON value.
pub fn canonicalize_json_bytes(bytes: &[u8]) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(canonicalize_value(&value))
}

/// Canonicalize an already-parsed JSON value.
#[must_use]
pub fn canonicalize_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => out.push_str(&encode_string(s)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(String, &Value)> =
                map.iter().map(|(k, v)| (encode_string(k), v)).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&key);
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn write_number(out: &mut String, n: &Number) {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
        if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
            out.push_str(&(f as i64).to_string());
            return;
        }
    }
    out.push_str(&n.to_string());
}

fn encode_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}
