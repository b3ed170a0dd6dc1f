//! Cleanup of free-form model replies.
//!
//! Models often wrap JSON in Markdown fences or prefix it with a stray
//! `json` word even when told not to. These helpers strip that noise before
//! the text reaches `serde_json`.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::trace;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```json|```").expect("valid fence regex"));
static JSON_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*json\s*").expect("valid prefix regex"));
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Remove Markdown code fences and a leading `json` tag from a reply.
pub fn strip_code_fences(raw: &str) -> String {
    let without_fences = FENCE_RE.replace_all(raw, "");
    let trimmed = without_fences.trim();
    JSON_PREFIX_RE.replace(trimmed, "").trim().to_string()
}

/// Normalize a model reply and parse it as JSON.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);
    trace!(cleaned = %cleaned, "normalized model reply");
    serde_json::from_str(&cleaned).context("model returned malformed JSON")
}

/// Parse the leading decimal number of `text`, ignoring leading whitespace.
///
/// Trailing content is ignored, so `"42 kg"` yields `42.0`. Returns `None`
/// when the text does not start with a number.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}
