//! Sustainability impact of a confirmed swap.
//!
//! The carbon estimate and the summary sentence both come from the model;
//! each step has a fixed fallback so a model outage still yields a summary.

use tracing::{debug, instrument, warn};

use crate::ai::common::GeminiClient;
use crate::ai::parse::parse_leading_number;
use crate::ai::prompts::{carbon_footprint_prompt, sustainability_summary_prompt};
use crate::text_utils::{format_amount, single_line};

/// Footprint used when the model gives no usable estimate, in kg CO₂.
pub const FALLBACK_CARBON_KG: f64 = 20.0;
pub const MIN_CARBON_KG: f64 = 1.0;
pub const MAX_CARBON_KG: f64 = 200.0;
pub const MAX_SUMMARY_CHARS: usize = 200;
pub const DEFAULT_ITEM_NAME: &str = "item";

/// Round half-up to two decimals.
pub fn round2(x: f64) -> f64 {
    ((x + f64::EPSILON) * 100.0 + 0.5).floor() / 100.0
}

/// Money saved by swapping instead of buying new; never negative.
pub fn money_saved(estimated_new_cost: f64, actual_swap_cost: f64) -> f64 {
    round2(estimated_new_cost - actual_swap_cost).max(0.0)
}

pub fn fallback_summary(co2_saved_kg: f64, money_saved: f64) -> String {
    format!(
        "You saved about {} kg CO₂ and ${} by swapping instead of buying new.",
        format_amount(co2_saved_kg),
        format_amount(money_saved)
    )
}

/// Estimate the manufacturing footprint of a new `item_name` in kg CO₂.
#[instrument(level = "trace", skip(client))]
pub async fn estimate_carbon_footprint(client: &GeminiClient, item_name: &str) -> f64 {
    let reply = match client.generate_text(&carbon_footprint_prompt(item_name)).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!(error = %err, "carbon footprint estimate failed");
            return FALLBACK_CARBON_KG;
        }
    };

    match parse_leading_number(reply.trim()) {
        Some(kg) if (MIN_CARBON_KG..=MAX_CARBON_KG).contains(&kg) => round2(kg),
        _ => {
            debug!(reply = %reply, "unusable carbon footprint reply");
            FALLBACK_CARBON_KG
        }
    }
}

/// Ask the model for a one-line summary of the savings.
#[instrument(level = "trace", skip(client))]
pub async fn generate_summary(
    client: &GeminiClient,
    co2_saved_kg: f64,
    money_saved: f64,
    item_name: &str,
) -> String {
    let prompt = sustainability_summary_prompt(co2_saved_kg, money_saved, item_name);
    match client.generate_text(&prompt).await {
        Ok(reply) => {
            let line = single_line(&reply, MAX_SUMMARY_CHARS);
            if line.is_empty() {
                warn!("empty sustainability summary");
                fallback_summary(co2_saved_kg, money_saved)
            } else {
                line
            }
        }
        Err(err) => {
            warn!(error = %err, "sustainability summary failed");
            fallback_summary(co2_saved_kg, money_saved)
        }
    }
}

/// Compute the sustainability summary for a swap.
///
/// Returns `None` when the estimated new cost is not a finite number.
pub async fn compute_sustainability_score(
    client: &GeminiClient,
    estimated_new_cost: Option<f64>,
    actual_swap_cost: f64,
    item_name: Option<&str>,
) -> Option<String> {
    let estimated = estimated_new_cost.filter(|c| c.is_finite())?;
    let actual = if actual_swap_cost.is_finite() {
        actual_swap_cost
    } else {
        0.0
    };
    let item = item_name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_ITEM_NAME);

    let saved = money_saved(estimated, actual);
    // Swapping avoids manufacturing a new one, so the whole footprint is saved.
    let co2_saved_kg = estimate_carbon_footprint(client, item).await;
    debug!(item, saved, co2_saved_kg, "computed swap savings");

    Some(generate_summary(client, co2_saved_kg, saved, item).await)
}
