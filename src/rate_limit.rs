//! In-memory rate limiting for unauthenticated endpoints.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`,
//! keyed by a client key (first `X-Forwarded-For` hop, else `"anonymous"`).
//! Two limiters are wired into `AppState`:
//! - Contact form: 5 submissions / 10 min per client
//! - Admin login: 10 attempts / 5 min per client
//!
//! TRADE-OFFS
//! ==========
//! State lives in one process and is lost on restart. Keys whose windows have
//! fully drained are dropped on the next write so the map does not grow with
//! every address that ever hit the site.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

use crate::config::env_parse;

const DEFAULT_CONTACT_LIMIT: usize = 5;
const DEFAULT_CONTACT_WINDOW_SECS: u64 = 600;

const DEFAULT_LOGIN_LIMIT: usize = 10;
const DEFAULT_LOGIN_WINDOW_SECS: u64 = 300;

pub const ANONYMOUS_CLIENT: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: usize,
    pub window: Duration,
}

impl RateLimitPolicy {
    #[must_use]
    pub fn contact_from_env() -> Self {
        Self {
            limit: env_parse("RATE_LIMIT_CONTACT", DEFAULT_CONTACT_LIMIT),
            window: Duration::from_secs(env_parse("RATE_LIMIT_CONTACT_WINDOW_SECS", DEFAULT_CONTACT_WINDOW_SECS)),
        }
    }

    #[must_use]
    pub fn login_from_env() -> Self {
        Self {
            limit: env_parse("RATE_LIMIT_LOGIN", DEFAULT_LOGIN_LIMIT),
            window: Duration::from_secs(env_parse("RATE_LIMIT_LOGIN_WINDOW_SECS", DEFAULT_LOGIN_WINDOW_SECS)),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("rate limit exceeded (max {limit} requests/{window_secs}s)")]
pub struct RateLimitExceeded {
    pub limit: usize,
    pub window_secs: u64,
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())), policy }
    }

    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Check the client's window, then record the request.
    pub fn check_and_record(&self, client_key: &str) -> Result<(), RateLimitExceeded> {
        self.check_and_record_at(client_key, Instant::now())
    }

    fn check_and_record_at(&self, client_key: &str, now: Instant) -> Result<(), RateLimitExceeded> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let policy = self.policy;

        inner.retain(|key, deque| {
            prune_window(deque, now, policy.window);
            key == client_key || !deque.is_empty()
        });

        let deque = inner.entry(client_key.to_owned()).or_default();
        if deque.len() >= policy.limit {
            return Err(RateLimitExceeded { limit: policy.limit, window_secs: policy.window.as_secs() });
        }
        deque.push_back(now);
        Ok(())
    }

    /// Forget a client's history (e.g. after a successful login).
    pub fn reset(&self, client_key: &str) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.remove(client_key);
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

/// Derive the rate-limit key for a request.
#[must_use]
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| ANONYMOUS_CLIENT.to_owned(), str::to_owned)
}

// =============================================================================
// HELPERS
// =============================================================================

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
