use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::ai::config::AiConfig;

/// One piece of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// Build the JSON body of a `generateContent` request.
pub fn build_generate_body(parts: &[Part]) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {
                "role": "user",
                "parts": parts,
            }
        ]
    })
}

/// Extract the reply text from a raw `generateContent` response body.
///
/// The text parts of the first candidate are concatenated. A blocked prompt,
/// a missing candidate or a candidate without text is an error.
pub fn parse_generate_text(raw: &str) -> Result<String> {
    let resp: GenerateResponse = serde_json::from_str(raw)?;
    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            bail!("prompt blocked: {reason}");
        }
        bail!("missing candidate in model response");
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(anyhow!("model response contained no text"));
    }
    Ok(text)
}

/// Thin wrapper around the Gemini REST API.
///
/// Holds a shared HTTP client (also used for image downloads) and the
/// optional model configuration. Without a configuration every model call
/// fails, which lets callers fall back the same way they do on a network
/// error.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Option<AiConfig>,
}

impl GeminiClient {
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn config(&self) -> Option<&AiConfig> {
        self.config.as_ref()
    }

    /// Send a prompt and return the raw reply text.
    #[instrument(level = "trace", skip(self, parts), fields(parts = parts.len()))]
    pub async fn generate_content(&self, parts: &[Part]) -> Result<String> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY is not configured"))?;
        let url = config.generate_url();
        debug!(url, model = %config.model, "sending generateContent request");

        let body = build_generate_body(parts);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &config.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err_text = resp.text().await.unwrap_or_default();
            warn!(%status, "Gemini API error");
            return Err(anyhow!("Gemini API error {status}: {err_text}"));
        }

        let raw = resp.text().await?;
        let snippet: String = raw.chars().take(200).collect();
        debug!(snippet = %snippet, "generateContent response body");
        trace!(raw = %raw, "generateContent response");
        parse_generate_text(&raw)
    }

    /// Convenience wrapper for text-only prompts.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate_content(&[Part::text(prompt)]).await
    }
}
