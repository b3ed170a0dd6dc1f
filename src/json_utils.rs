//! Loose accessors for client-supplied JSON documents.
//!
//! Swap documents come from the mobile client with no fixed schema, so fields
//! are looked up by path and coerced the way the client app treats them:
//! `null`, `false`, `0`, `""` and absent fields are all "empty".

use serde_json::Value;

/// Whether a value counts as present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Look up a dotted path such as `newItem.estimatedValue`.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |cur, key| cur.get(key))
}

/// Return the first truthy value among `paths`.
pub fn first_truthy<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|p| get_path(value, p))
        .find(|v| is_truthy(v))
}

/// Numeric coercion: numbers as-is, numeric strings parsed, booleans as 1/0.
///
/// Returns `None` for anything that is not a finite number.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}
