use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::ai::common::GeminiClient;
use crate::db::Database;
use crate::handlers::{negotiation, swaps, valuation};

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub rate_limit_per_second: Option<u64>,
}

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub gemini: GeminiClient,
}

#[derive(Clone, Debug)]
pub(crate) struct RequestContext {
    pub(crate) request_id: String,
}

#[derive(Debug)]
struct RateLimiter {
    limit: u64,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

pub fn router(state: AppState, config: ApiConfig) -> Router {
    let request_id_layer = middleware::from_fn(assign_request_id);
    let mut router = Router::new()
        .route("/ai/metadataValuation", post(valuation::metadata_valuation))
        .route("/ai/negotiationCoach", post(negotiation::negotiation_coach))
        .route("/swaps/confirm", post(swaps::confirm_swap))
        .with_state(state);

    if let Some(rate_limit) = config.rate_limit_per_second {
        let limiter = Arc::new(RateLimiter {
            limit: rate_limit,
            window: Duration::from_secs(1),
            timestamps: Mutex::new(VecDeque::new()),
        });
        let rate_limit_layer = middleware::from_fn_with_state(limiter, rate_limit_requests);
        router = router.layer(rate_limit_layer);
    }

    router
        .layer(request_id_layer)
        .layer(CorsLayer::permissive())
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    let header_value = match request_id.parse() {
        Ok(value) => value,
        Err(_) => {
            return response;
        }
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-request-id"), header_value);
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

async fn rate_limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.as_str())
        .unwrap_or("unknown");
    let now = Instant::now();
    let mut timestamps = limiter.timestamps.lock().await;
    while let Some(ts) = timestamps.front() {
        if now.duration_since(*ts) >= limiter.window {
            timestamps.pop_front();
        } else {
            break;
        }
    }

    if timestamps.len() as u64 >= limiter.limit {
        tracing::debug!(request_id, "API rate limit exceeded");
        return error_response(StatusCode::TOO_MANY_REQUESTS, "rate_limited", None);
    }
    timestamps.push_back(now);
    drop(timestamps);
    next.run(req).await
}

pub(crate) fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: Option<String>,
) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            details,
        }),
    )
        .into_response()
}

pub(crate) fn invalid_request_response() -> Response {
    error_response(StatusCode::BAD_REQUEST, "invalid_request", None)
}

pub(crate) fn bad_request_response(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, message, None)
}

pub(crate) fn model_error_response(label: &str, err: &anyhow::Error) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        label,
        Some(format!("{err:#}")),
    )
}
