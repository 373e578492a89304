//! # disrepair-server
//!
//! HTTP front end for [`disrepair_engine`]. Exposes `POST /api/overlap`, which
//! validates a set of disrepair periods, resolves the property's room total, and
//! returns weeks-in-disrepair per concurrent room count as JSON.
//!
//! Each request is authenticated against a static API-key map (or the
//! first-party marker header) and counted against a per-client fixed-window
//! rate limit before the engine runs.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::build_router;
pub use state::AppState;
