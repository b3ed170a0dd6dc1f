use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json_utils::is_truthy;

/// Maximum number of listing images forwarded to the model.
pub const MAX_IMAGES: usize = 3;

/// Number of most recent chat messages included in a negotiation prompt.
pub const TRANSCRIPT_WINDOW: usize = 20;

/// Free-form listing metadata as posted by the client.
///
/// Only a few fields are interpreted; the whole object is embedded in the
/// valuation prompt as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingMetadata(pub Map<String, Value>);

impl ListingMetadata {
    /// Non-object payloads are treated as empty metadata.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| is_truthy(v))
    }

    pub fn has_title_or_description(&self) -> bool {
        self.field("title").is_some() || self.field("description").is_some()
    }

    /// The first [`MAX_IMAGES`] entries of `images` that are strings.
    pub fn image_urls(&self) -> Vec<String> {
        match self.0.get("images") {
            Some(Value::Array(images)) => images
                .iter()
                .take(MAX_IMAGES)
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn product_link(&self) -> Option<&Value> {
        self.field("productLink")
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub base_price: Option<f64>,
    pub age_factor: Option<f64>,
    pub condition_factor: Option<f64>,
    pub brand_factor: Option<f64>,
    pub accessory_value: Option<f64>,
}

/// Valuation returned by the model for a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub value: Option<f64>,
    pub confidence: f64,
    #[serde(default)]
    pub breakdown: Breakdown,
    pub explanation: String,
}

/// One transcript entry. Fields keep whatever JSON the client sent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLine {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub is_current_user: Option<Value>,
}

impl ChatLine {
    pub fn from_current_user(&self) -> bool {
        self.is_current_user.as_ref().is_some_and(is_truthy)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub title: Value,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub estimated_value: Option<Value>,
    #[serde(default)]
    pub condition: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOffer {
    #[serde(default)]
    pub cash_adjustment: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationRequest {
    pub chat_transcript: Vec<ChatLine>,
    pub user_item: ItemSummary,
    pub other_user_item: ItemSummary,
    #[serde(default)]
    pub current_offer: Option<CurrentOffer>,
}

impl NegotiationRequest {
    /// Check the required fields of a raw request body.
    ///
    /// Returns the client-facing message of the first failed check.
    pub fn validate(body: &Value) -> Result<(), &'static str> {
        let transcript_ok = body
            .get("chatTranscript")
            .and_then(Value::as_array)
            .is_some_and(|t| !t.is_empty());
        if !transcript_ok {
            return Err("chatTranscript is required and must be a non-empty array");
        }
        if !has_title(body, "userItem") {
            return Err("userItem with title is required");
        }
        if !has_title(body, "otherUserItem") {
            return Err("otherUserItem with title is required");
        }
        Ok(())
    }

    /// The most recent [`TRANSCRIPT_WINDOW`] messages, oldest first.
    pub fn recent_messages(&self) -> &[ChatLine] {
        let start = self.chat_transcript.len().saturating_sub(TRANSCRIPT_WINDOW);
        &self.chat_transcript[start..]
    }
}

fn has_title(body: &Value, key: &str) -> bool {
    body.get(key)
        .and_then(|item| item.get("title"))
        .is_some_and(is_truthy)
}

/// Negotiation advice returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationAdvice {
    pub suggestion_phrase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_cash_adjustment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiation_tips: Option<Vec<String>>,
}
