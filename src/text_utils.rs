use serde_json::Value;
use tracing::trace;

/// Render an amount the way it is shown to the model and users.
///
/// Whole numbers drop the fractional part (`25`, not `25.0`).
pub fn format_amount(amount: f64) -> String {
    format!("{amount}")
}

/// Render a JSON scalar for inclusion in a prompt line.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_amount).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Collapse a reply to a single line capped at `max_chars` characters.
pub fn single_line(text: &str, max_chars: usize) -> String {
    let line: String = text
        .trim()
        .replace('\n', " ")
        .chars()
        .take(max_chars)
        .collect();
    trace!(?line, "collapsed reply to single line");
    line
}
