use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use disrepair_engine::DisrepairError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`DisrepairError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
/// `{ "error" }` for client errors, `{ "error", "details" }` for internal ones.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `disrepair_engine`.
    #[error(transparent)]
    Engine(#[from] DisrepairError),

    /// The request body could not be read as an overlap request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Duration },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Engine(err) if err.is_client_error() => {
                client_error(StatusCode::BAD_REQUEST, engine_message(&err))
            }
            AppError::Engine(err) => internal_error(err.to_string()),
            AppError::BadRequest(msg) => client_error(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => client_error(StatusCode::UNAUTHORIZED, msg),
            AppError::RateLimited { retry_after } => {
                let mut response = client_error(
                    StatusCode::TOO_MANY_REQUESTS,
                    "Rate limit exceeded. Please try again later.".to_string(),
                );
                // Round up so clients never retry before the window closes.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                response
            }
            AppError::MethodNotAllowed => client_error(
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::Internal(details) => internal_error(details),
        }
    }
}

/// Validation messages go out as-is; malformed dates name the offending value.
fn engine_message(err: &DisrepairError) -> String {
    match err {
        DisrepairError::InvalidInput(msg) => msg.clone(),
        DisrepairError::MalformedDate(raw) => format!("Invalid date format: '{raw}'"),
        DisrepairError::Computation(msg) => msg.clone(),
    }
}

fn client_error(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn internal_error(details: String) -> Response {
    tracing::error!(error = %details, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "error": "Failed to calculate overlaps",
            "details": details,
        })),
    )
        .into_response()
}
