//! Request gatekeeping extractor: authentication followed by rate limiting.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::Caller;
use crate::error::AppError;
use crate::rate_limit::RateLimitDecision;
use crate::state::AppState;

/// An authenticated caller that has passed the rate limit.
///
/// Use this as an extractor parameter in any handler that runs the engine:
///
/// ```ignore
/// async fn my_handler(client: AdmittedClient) -> AppResult<Json<()>> {
///     tracing::info!(client = client.caller.name(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdmittedClient {
    pub caller: Caller,
    /// The key the rate limiter counted this request under.
    pub identity: String,
    pub quota: RateLimitDecision,
}

impl FromRequestParts<AppState> for AdmittedClient {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = state.api_keys.authenticate(&parts.headers)?;

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let identity = client_identity(&caller, &parts.headers, peer);

        let quota = state.rate_limiter.check(&identity);
        if !quota.allowed {
            tracing::warn!(client = caller.name(), %identity, "rate limit exceeded");
            return Err(AppError::RateLimited {
                retry_after: quota.reset_after,
            });
        }

        Ok(AdmittedClient {
            caller,
            identity,
            quota,
        })
    }
}

/// Rate-limit identity: the presented API key, else the network address.
///
/// The address is the socket peer when known, then the first `x-forwarded-for`
/// hop, then `"unknown"`.
pub fn client_identity(caller: &Caller, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(key) = caller.api_key() {
        return format!("key:{key}");
    }

    let address = peer.map(|addr| addr.ip().to_string()).or_else(|| {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    });

    format!("ip:{}", address.as_deref().unwrap_or("unknown"))
}
