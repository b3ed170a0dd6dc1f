use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::ai::negotiation::request_negotiation_advice;
use crate::api::{
    bad_request_response, invalid_request_response, model_error_response, AppState,
    RequestContext,
};
use crate::models::NegotiationRequest;

pub(crate) async fn negotiation_coach(
    State(state): State<AppState>,
    Extension(request): Extension<RequestContext>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return invalid_request_response();
    };
    if let Err(message) = NegotiationRequest::validate(&body) {
        tracing::debug!(
            request_id = %request.request_id,
            reason = message,
            "Rejected negotiation request"
        );
        return bad_request_response(message);
    }
    let req: NegotiationRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(err) => {
            tracing::debug!(
                request_id = %request.request_id,
                error = %err,
                "Malformed negotiation request"
            );
            return invalid_request_response();
        }
    };

    match request_negotiation_advice(&state.gemini, &req).await {
        Ok(advice) => {
            tracing::debug!(
                request_id = %request.request_id,
                suggested_cash_adjustment = ?advice.suggested_cash_adjustment,
                "Negotiation advice ready"
            );
            (StatusCode::OK, Json(advice)).into_response()
        }
        Err(err) => {
            tracing::error!(
                request_id = %request.request_id,
                error = %err,
                "Negotiation coach failed"
            );
            model_error_response("Negotiation coach error", &err)
        }
    }
}
