//! Server configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse are logged and replaced by the default.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// HTTP port (default: 8080).
    pub port: u16,
    /// Static API key → client name mapping. Empty means no key is required.
    pub api_keys: HashMap<String, String>,
    /// Header that marks a request as coming from the first-party web form.
    pub first_party_header: String,
    /// Value the first-party header must carry.
    pub first_party_value: String,
    /// Requests allowed per client per window (default: 60).
    pub rate_limit_max: u32,
    /// Length of a rate-limit window (default: 60s).
    pub rate_limit_window: Duration,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes (default: 1 MiB).
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_keys: HashMap::new(),
            first_party_header: "x-disrepair-client".to_string(),
            first_party_value: "web-form".to_string(),
            rate_limit_max: 60,
            rate_limit_window: Duration::from_secs(60),
            cors_origins: Vec::new(),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                            | Default              |
    /// |------------------------------------|----------------------|
    /// | `DISREPAIR_HOST`                   | `0.0.0.0`            |
    /// | `DISREPAIR_PORT`                   | `8080`               |
    /// | `DISREPAIR_API_KEYS`               | (none)               |
    /// | `DISREPAIR_FIRST_PARTY_HEADER`     | `x-disrepair-client` |
    /// | `DISREPAIR_FIRST_PARTY_VALUE`      | `web-form`           |
    /// | `DISREPAIR_RATE_LIMIT_MAX`         | `60`                 |
    /// | `DISREPAIR_RATE_LIMIT_WINDOW_SECS` | `60`                 |
    /// | `DISREPAIR_CORS_ORIGINS`           | (any)                |
    /// | `DISREPAIR_BODY_LIMIT_BYTES`       | `1048576`            |
    ///
    /// `DISREPAIR_API_KEYS` is a comma-separated list of `key:client` pairs.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("DISREPAIR_HOST") {
            cfg.host = host;
        }
        if let Some(port) = parse_var("DISREPAIR_PORT") {
            cfg.port = port;
        }
        if let Ok(raw) = env::var("DISREPAIR_API_KEYS") {
            cfg.api_keys = parse_api_keys(&raw);
        }
        if let Ok(header) = env::var("DISREPAIR_FIRST_PARTY_HEADER") {
            cfg.first_party_header = header.to_ascii_lowercase();
        }
        if let Ok(value) = env::var("DISREPAIR_FIRST_PARTY_VALUE") {
            cfg.first_party_value = value;
        }
        if let Some(max) = parse_var("DISREPAIR_RATE_LIMIT_MAX") {
            cfg.rate_limit_max = max;
        }
        if let Some(secs) = parse_var::<u64>("DISREPAIR_RATE_LIMIT_WINDOW_SECS") {
            cfg.rate_limit_window = Duration::from_secs(secs);
        }
        if let Ok(raw) = env::var("DISREPAIR_CORS_ORIGINS") {
            cfg.cors_origins = split_list(&raw);
        }
        if let Some(bytes) = parse_var("DISREPAIR_BODY_LIMIT_BYTES") {
            cfg.body_limit_bytes = bytes;
        }

        cfg
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparseable configuration value");
            None
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `key:client,key2:client2`. A bare key maps to itself as the client name.
pub fn parse_api_keys(raw: &str) -> HashMap<String, String> {
    split_list(raw)
        .into_iter()
        .map(|entry| match entry.split_once(':') {
            Some((key, client)) => (key.trim().to_string(), client.trim().to_string()),
            None => (entry.clone(), entry),
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
