//! Per-client fixed-window rate limiting.
//!
//! Each client identity owns a counter and the instant its window opened. When a
//! request arrives after the window has elapsed, the counter resets to 1 and a new
//! window opens at that moment; nothing decays in between.
//!
//! The limiter is an ordinary value held in [`AppState`](crate::state::AppState),
//! so tests construct their own and drive it with explicit instants.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset_after: Duration,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<String, WindowState>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` now.
    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    /// Record a request from `client` at `now`.
    pub fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        let mut clients = self.lock();

        let state = clients
            .entry(client.to_string())
            .and_modify(|state| {
                if now.saturating_duration_since(state.window_start) >= self.window {
                    state.count = 1;
                    state.window_start = now;
                } else {
                    state.count = state.count.saturating_add(1);
                }
            })
            .or_insert(WindowState {
                count: 1,
                window_start: now,
            });

        let elapsed = now.saturating_duration_since(state.window_start);
        RateLimitDecision {
            allowed: state.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(state.count),
            reset_after: self.window.saturating_sub(elapsed),
        }
    }

    /// Drop clients whose window closed before `now`.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut clients = self.lock();
        let before = clients.len();
        clients.retain(|_, state| now.saturating_duration_since(state.window_start) < self.window);
        before - clients.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    // Every update leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, WindowState>> {
        self.clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
