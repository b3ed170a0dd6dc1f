use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{invalid_request_response, AppState, RequestContext};
use crate::json_utils::is_truthy;
use crate::swap::confirm_swap as confirm;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest {
    #[serde(default)]
    swap_id: Option<String>,
    #[serde(default)]
    swap: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmResponse {
    success: bool,
    swap_id: Option<String>,
    sustainability_impact: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmFailure {
    success: bool,
    error: String,
    sustainability_impact: Option<String>,
}

pub(crate) async fn confirm_swap(
    State(state): State<AppState>,
    Extension(request): Extension<RequestContext>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return invalid_request_response();
    };
    let req: ConfirmRequest = if body.is_null() {
        ConfirmRequest::default()
    } else {
        match serde_json::from_value(body) {
            Ok(req) => req,
            Err(_) => return invalid_request_response(),
        }
    };
    let swap_id = req.swap_id.filter(|id| !id.is_empty());
    let inline = req.swap.filter(is_truthy);

    match confirm(&state.db, &state.gemini, swap_id.as_deref(), inline.as_ref()).await {
        Ok(impact) => {
            tracing::info!(
                request_id = %request.request_id,
                swap_id = swap_id.as_deref().unwrap_or("none"),
                has_impact = impact.is_some(),
                "Swap confirmed"
            );
            (
                StatusCode::OK,
                Json(ConfirmResponse {
                    success: true,
                    swap_id,
                    sustainability_impact: impact,
                }),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(
                request_id = %request.request_id,
                swap_id = swap_id.as_deref().unwrap_or("none"),
                error = %err,
                "Error computing sustainability impact for swap confirm"
            );
            (
                StatusCode::OK,
                Json(ConfirmFailure {
                    success: false,
                    error: format!("{err:#}"),
                    sustainability_impact: None,
                }),
            )
                .into_response()
        }
    }
}
