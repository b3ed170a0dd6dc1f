//! Prompt builders for every model call.
//!
//! Each prompt ends with the exact output contract the reply is parsed
//! against, so changing a schema here means changing the matching type in
//! [`crate::models`].

use std::fmt::Write as _;

use serde_json::Value;

use crate::json_utils::{is_truthy, to_number};
use crate::models::{ItemSummary, ListingMetadata, NegotiationRequest};
use crate::text_utils::{display_value, format_amount};

pub const VALUATION_SCHEMA: &str = r#"{"value": <float>, "confidence": <float>, "breakdown": {"basePrice": <float>, "ageFactor": <float>, "conditionFactor": <float>, "brandFactor": <float>, "accessoryValue": <float>}, "explanation": "<short human explanation 1-3 sentences>"}"#;

pub const NEGOTIATION_SCHEMA: &str = r#"{
  "suggestionPhrase": "<A friendly, natural message the user can send (1-2 sentences)>",
  "suggestedCashAdjustment": <number (positive if user should pay, negative if user should receive, 0 for even swap)>,
  "explanation": "<Brief explanation of the strategy and why this approach makes sense (2-3 sentences)>",
  "negotiationTips": ["<tip1>", "<tip2>", "<tip3>"]
}"#;

/// Build the valuation prompt for a listing.
pub fn valuation_prompt(metadata: &ListingMetadata, has_images: bool) -> String {
    let mut prompt = String::from(
        "You are an expert used-goods valuation assistant for a college barter marketplace.\n",
    );
    if has_images {
        prompt.push_str("Images provided.\n");
    }
    if let Some(link) = metadata.product_link() {
        let _ = writeln!(prompt, "Product link: {}.", display_value(link));
    }
    let _ = writeln!(prompt, "Input metadata as JSON: {}.", metadata.to_json());
    prompt.push_str("Return valid JSON only, following this exact schema:\n\n");
    prompt.push_str(VALUATION_SCHEMA);
    prompt.push('\n');
    prompt.push_str("Compute value = round(basePrice * ageFactor * conditionFactor * brandFactor + accessoryValue, 2). If you cannot determine basePrice, return basePrice=null and confidence=0.0.");
    prompt
}

/// Render an optional field only when it is truthy.
fn present(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(display_value)
}

fn push_item(prompt: &mut String, heading: &str, item: &ItemSummary) {
    let _ = writeln!(prompt, "{heading}:");
    let _ = writeln!(prompt, "- Title: {}", display_value(&item.title));
    if let Some(desc) = present(item.description.as_ref()) {
        let _ = writeln!(prompt, "- Description: {desc}");
    }
    if let Some(value) = present(item.estimated_value.as_ref()) {
        let _ = writeln!(prompt, "- Estimated Value: ${value}");
    }
    if let Some(condition) = present(item.condition.as_ref()) {
        let _ = writeln!(prompt, "- Condition: {condition}");
    }
}

/// Build the negotiation-coach prompt.
pub fn negotiation_prompt(req: &NegotiationRequest) -> String {
    let mut prompt = String::from(
        "You are an expert negotiation coach for a college barter marketplace. Analyze the conversation and provide helpful negotiation advice.\n\n",
    );

    push_item(&mut prompt, "USER'S ITEM", &req.user_item);
    prompt.push('\n');
    push_item(&mut prompt, "OTHER USER'S ITEM", &req.other_user_item);

    if let Some(offer) = &req.current_offer {
        prompt.push_str("\nCURRENT OFFER:\n");
        if let Some(cash) = &offer.cash_adjustment {
            let side = if to_number(cash).is_some_and(|n| n > 0.0) {
                "(user pays)"
            } else {
                "(user receives)"
            };
            let _ = writeln!(prompt, "- Cash adjustment: ${} {side}", display_value(cash));
        }
        if let Some(status) = present(offer.status.as_ref()) {
            let _ = writeln!(prompt, "- Status: {status}");
        }
    }

    prompt.push_str("\nCHAT TRANSCRIPT (most recent 20 messages):\n");
    for line in req.recent_messages() {
        let sender = if line.from_current_user() { "YOU" } else { "THEM" };
        let message = line.message.as_ref().map(display_value).unwrap_or_default();
        let _ = writeln!(prompt, "[{sender}]: {message}");
    }

    prompt.push_str("\n\nBased on the conversation and items, provide negotiation advice. Return ONLY valid JSON with this exact schema:\n\n");
    prompt.push_str(NEGOTIATION_SCHEMA);
    prompt.push_str("\n\n");
    prompt.push_str("Make suggestions friendly, college-student appropriate, and focused on fair value exchange. Consider item conditions, estimated values, and conversation tone. And if the determined price itself seemed fair, just say that its already a fair trade, so no adjustment is needed.");
    prompt
}

/// Ask for the manufacturing footprint of a new item as a bare number.
pub fn carbon_footprint_prompt(item_name: &str) -> String {
    format!(
        "You are an environmental expert. Estimate the carbon footprint (kg CO₂) for manufacturing a brand-new \"{item_name}\". Return ONLY a single number between 1 and 200. Do not include units or explanation."
    )
}

/// Ask for a one-sentence sustainability summary.
pub fn sustainability_summary_prompt(
    co2_saved_kg: f64,
    money_saved: f64,
    item_name: &str,
) -> String {
    format!(
        "You are a sustainability communicator. Write exactly one short sentence (max 20 words) about the positive sustainability impact of swapping a \"{item_name}\" instead of buying new, where the user saved {} kg CO₂ and ${}. Return ONLY the sentence, no extra text.",
        format_amount(co2_saved_kg),
        format_amount(money_saved)
    )
}
