use anyhow::Result;
use tracing::{debug, instrument};

use crate::ai::common::{GeminiClient, Part};
use crate::ai::parse::parse_model_json;
use crate::ai::prompts::valuation_prompt;
use crate::ai::vision::fetch_image_parts;
use crate::models::{ListingMetadata, Valuation};

/// Ask the model to value a listing, attaching up to three images.
#[instrument(level = "trace", skip(client, metadata))]
pub async fn request_valuation(
    client: &GeminiClient,
    metadata: &ListingMetadata,
) -> Result<Valuation> {
    let urls = metadata.image_urls();
    let prompt = valuation_prompt(metadata, !urls.is_empty());

    let mut parts = vec![Part::text(prompt)];
    parts.extend(fetch_image_parts(client.http(), &urls).await);
    debug!(
        requested = urls.len(),
        attached = parts.len() - 1,
        "prepared valuation request"
    );

    let raw = client.generate_content(&parts).await?;
    parse_model_json(&raw)
}
