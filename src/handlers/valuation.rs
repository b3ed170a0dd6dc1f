use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::ai::valuation::request_valuation;
use crate::api::{
    bad_request_response, invalid_request_response, model_error_response, AppState,
    RequestContext,
};
use crate::models::ListingMetadata;

pub(crate) async fn metadata_valuation(
    State(state): State<AppState>,
    Extension(request): Extension<RequestContext>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return invalid_request_response();
    };
    let metadata = ListingMetadata::from_value(body);
    if !metadata.has_title_or_description() {
        return bad_request_response("provide title or description");
    }

    match request_valuation(&state.gemini, &metadata).await {
        Ok(valuation) => {
            tracing::debug!(
                request_id = %request.request_id,
                value = ?valuation.value,
                confidence = valuation.confidence,
                "Valuation completed"
            );
            (StatusCode::OK, Json(valuation)).into_response()
        }
        Err(err) => {
            tracing::error!(
                request_id = %request.request_id,
                error = %err,
                "Gemini valuation failed"
            );
            model_error_response("Gemini error", &err)
        }
    }
}
