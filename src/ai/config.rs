use std::env;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = non_empty_var("GEMINI_API_KEY")?;
        Some(Self {
            api_key,
            model: non_empty_var("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_url: non_empty_var("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
        })
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

// An empty variable is treated the same as an unset one.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
