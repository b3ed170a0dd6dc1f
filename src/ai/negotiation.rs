use anyhow::Result;
use tracing::{debug, instrument};

use crate::ai::common::GeminiClient;
use crate::ai::parse::parse_model_json;
use crate::ai::prompts::negotiation_prompt;
use crate::models::{NegotiationAdvice, NegotiationRequest};

/// Ask the model for negotiation advice on a pending swap.
#[instrument(level = "trace", skip_all)]
pub async fn request_negotiation_advice(
    client: &GeminiClient,
    req: &NegotiationRequest,
) -> Result<NegotiationAdvice> {
    let prompt = negotiation_prompt(req);
    debug!(
        messages = req.recent_messages().len(),
        "sending negotiation coach request"
    );
    let raw = client.generate_text(&prompt).await?;
    parse_model_json(&raw)
}
