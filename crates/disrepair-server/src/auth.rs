//! Static API-key authentication.
//!
//! Keys are looked up in a fixed `key → client` map from configuration. Requests
//! carrying the first-party marker header (the bundled web form) skip the lookup,
//! and with no keys configured every request is let through.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Who is calling, as far as authentication could tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// A request presenting a known API key.
    ApiKey { key: String, client: String },
    /// A request carrying the first-party marker header.
    FirstParty,
    /// No keys are configured, so the caller is not identified.
    Anonymous,
}

impl Caller {
    /// The API key, when the caller presented one.
    pub fn api_key(&self) -> Option<&str> {
        match self {
            Caller::ApiKey { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Caller::ApiKey { client, .. } => client,
            Caller::FirstParty => "first-party",
            Caller::Anonymous => "anonymous",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiKeyRegistry {
    keys: HashMap<String, String>,
    first_party_header: String,
    first_party_value: String,
}

impl ApiKeyRegistry {
    pub fn new(
        keys: HashMap<String, String>,
        first_party_header: impl Into<String>,
        first_party_value: impl Into<String>,
    ) -> Self {
        Self {
            keys,
            first_party_header: first_party_header.into(),
            first_party_value: first_party_value.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.api_keys.clone(),
            config.first_party_header.clone(),
            config.first_party_value.clone(),
        )
    }

    /// Resolve the caller from request headers.
    ///
    /// The key is read from `x-api-key`, or from `Authorization: Bearer <key>`.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` when keys are configured and the request
    /// neither carries the first-party marker nor presents a known key.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AppError> {
        let presented = presented_key(headers);

        if let Some(key) = presented {
            if let Some(client) = self.keys.get(key) {
                return Ok(Caller::ApiKey {
                    key: key.to_string(),
                    client: client.clone(),
                });
            }
        }

        if self.is_first_party(headers) {
            return Ok(Caller::FirstParty);
        }

        if self.keys.is_empty() {
            return Ok(Caller::Anonymous);
        }

        Err(AppError::Unauthorized(match presented {
            Some(_) => "Invalid API key".to_string(),
            None => "Missing API key. Provide it in the x-api-key header".to_string(),
        }))
    }

    fn is_first_party(&self, headers: &HeaderMap) -> bool {
        headers
            .get(self.first_party_header.as_str())
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == self.first_party_value)
    }
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let from_header = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    let from_bearer = || {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
    };

    from_header.or_else(from_bearer).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn registry() -> ApiKeyRegistry {
        let keys = HashMap::from([("secret-1".to_string(), "acme".to_string())]);
        ApiKeyRegistry::new(keys, "x-disrepair-client", "web-form")
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn known_key_resolves_client() {
        let caller = registry()
            .authenticate(&headers(&[("x-api-key", "secret-1")]))
            .unwrap();
        assert_eq!(caller.name(), "acme");
        assert_eq!(caller.api_key(), Some("secret-1"));
    }

    #[test]
    fn bearer_token_is_accepted() {
        let caller = registry()
            .authenticate(&headers(&[("authorization", "Bearer secret-1")]))
            .unwrap();
        assert_eq!(caller.name(), "acme");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = registry()
            .authenticate(&headers(&[("x-api-key", "nope")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid API key"));
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = registry().authenticate(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn first_party_marker_skips_key_check() {
        let caller = registry()
            .authenticate(&headers(&[("x-disrepair-client", "web-form")]))
            .unwrap();
        assert_eq!(caller, Caller::FirstParty);
    }

    #[test]
    fn wrong_marker_value_is_not_first_party() {
        let result = registry().authenticate(&headers(&[("x-disrepair-client", "curl")]));
        assert!(result.is_err());
    }

    #[test]
    fn open_mode_without_configured_keys() {
        let open = ApiKeyRegistry::new(HashMap::new(), "x-disrepair-client", "web-form");
        assert_eq!(open.authenticate(&HeaderMap::new()).unwrap(), Caller::Anonymous);
    }
}
