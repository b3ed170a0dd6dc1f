use anyhow::Result;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::ai::common::GeminiClient;
use crate::db::Database;
use crate::json_utils::{first_truthy, to_number};
use crate::sustainability::{compute_sustainability_score, round2};

const ESTIMATED_NEW_COST_PATHS: &[&str] = &[
    "estimatedNewCost",
    "newItem.estimatedValue",
    "newItem.valuation",
    "estimatedValueNew",
    "valuation.value",
];

const ITEM_NAME_PATHS: &[&str] = &[
    "itemName",
    "newItemName",
    "newItem.name",
    "title",
    "newItem.title",
];

const PROPOSER_ITEM_VALUE_PATHS: &[&str] = &[
    "proposerItemValue",
    "offerValue",
    "offerItem.estimatedValue",
    "offerItem.valuation",
    "offer.value",
];

const PROPOSER_CASH_PATHS: &[&str] = &["proposerCash", "cashPaid", "proposerPaid"];

/// The figures of a swap document that feed the sustainability summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapFigures {
    /// What the received item would cost new; `None` if absent or non-numeric.
    pub estimated_new_cost: Option<f64>,
    pub item_name: Option<String>,
    /// Value of the item given plus cash paid, rounded to cents; 0 when
    /// either figure is not a number.
    pub actual_swap_cost: f64,
}

impl SwapFigures {
    /// Pull the figures out of a loosely structured swap document.
    ///
    /// Several historical field names are accepted for each figure; the
    /// first non-empty one wins.
    pub fn from_document(doc: &Value) -> Self {
        let estimated_new_cost = first_truthy(doc, ESTIMATED_NEW_COST_PATHS).and_then(to_number);

        let item_name = first_truthy(doc, ITEM_NAME_PATHS)
            .and_then(Value::as_str)
            .map(str::to_string);

        // Absent figures count as 0; a present but non-numeric one voids the
        // whole sum, which then counts as 0.
        let item_value = first_truthy(doc, PROPOSER_ITEM_VALUE_PATHS).map_or(Some(0.0), to_number);
        let cash = first_truthy(doc, PROPOSER_CASH_PATHS).map_or(Some(0.0), to_number);
        let actual_swap_cost = match (item_value, cash) {
            (Some(value), Some(cash)) => round2(value + cash),
            _ => 0.0,
        };

        Self {
            estimated_new_cost,
            item_name,
            actual_swap_cost,
        }
    }
}

/// Compute and store the sustainability impact of a confirmed swap.
///
/// The stored document is preferred over the inline copy sent by the
/// client. When `swap_id` is given the impact (or `null`) is written back to
/// that document, which must exist.
#[instrument(level = "trace", skip(db, gemini, inline))]
pub async fn confirm_swap(
    db: &Database,
    gemini: &GeminiClient,
    swap_id: Option<&str>,
    inline: Option<&Value>,
) -> Result<Option<String>> {
    let stored = match swap_id {
        Some(id) => db.get_swap(id).await?,
        None => None,
    };
    let empty = Value::Object(Default::default());
    let source = stored.as_ref().or(inline).unwrap_or(&empty);
    debug!(from_store = stored.is_some(), "resolved swap document");

    let figures = SwapFigures::from_document(source);
    let impact = compute_sustainability_score(
        gemini,
        figures.estimated_new_cost,
        figures.actual_swap_cost,
        figures.item_name.as_deref(),
    )
    .await;

    if let Some(id) = swap_id {
        db.set_sustainability_impact(id, impact.as_deref()).await?;
    }
    Ok(impact)
}
