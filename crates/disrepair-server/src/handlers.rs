//! HTTP request handlers.

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use disrepair_engine::OverlapRequest;
use serde_json::json;

use crate::client::AdmittedClient;
use crate::error::{AppError, AppResult};

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

// ============================================================================
// Overlap calculation
// ============================================================================

/// `POST /api/overlap`: validate the periods, resolve the room total, aggregate.
///
/// The body is read as raw bytes so that malformed JSON gets the same
/// `{ "error" }` shape as every other validation failure.
pub async fn handle_calculate(client: AdmittedClient, body: Bytes) -> AppResult<Response> {
    let request: OverlapRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let period_count = request.periods.as_ref().map_or(0, Vec::len);
    // Wide date ranges build one timeline entry per day; keep that off the async workers.
    let rows = tokio::task::spawn_blocking(move || request.evaluate())
        .await
        .map_err(|e| AppError::Internal(format!("overlap task failed: {e}")))??;

    tracing::info!(
        client = client.caller.name(),
        identity = %client.identity,
        periods = period_count,
        levels = rows.len(),
        "calculated disrepair overlaps"
    );

    let headers = [
        (RATE_LIMIT_LIMIT, HeaderValue::from(client.quota.limit)),
        (RATE_LIMIT_REMAINING, HeaderValue::from(client.quota.remaining)),
    ];
    Ok((headers, Json(rows)).into_response())
}

/// Plain `OPTIONS` requests that are not CORS preflights.
pub async fn handle_options() -> StatusCode {
    StatusCode::OK
}

pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

// ============================================================================
// Health
// ============================================================================

pub async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
