#![allow(dead_code)]

use barterbrain::ai::common::GeminiClient;
use barterbrain::ai::config::AiConfig;
use serde_json::json;
use wiremock::MockServer;

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

pub fn gemini_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(Some(AiConfig {
        api_key: "k".into(),
        model: "gemini-2.5-flash".into(),
        api_url: format!("{}/v1beta", server.uri()),
    }))
}

/// A `generateContent` response whose only candidate replies with `text`.
pub fn reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}
