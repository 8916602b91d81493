//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the loaded config, the optional mailer, the
//! inbox broadcast channel and the per-endpoint rate limiters. Everything
//! inside is cheap to clone.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::services::mailer::Mailer;
use crate::services::message::{InboxEvent, inbox_channel};
use crate::services::storage::Storage;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// `None` when `RESEND_API_KEY`/`RESEND_FROM` are not configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub inbox: broadcast::Sender<InboxEvent>,
    pub storage: Storage,
    pub contact_limiter: RateLimiter,
    pub login_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: AppConfig, mailer: Option<Arc<dyn Mailer>>) -> Self {
        let storage = Storage::new(&config.upload_dir, &config.public_base_url, config.max_upload_bytes);
        Self {
            pool,
            config: Arc::new(config),
            mailer,
            inbox: inbox_channel(),
            storage,
            contact_limiter: RateLimiter::new(RateLimitPolicy::contact_from_env()),
            login_limiter: RateLimiter::new(RateLimitPolicy::login_from_env()),
        }
    }

    #[must_use]
    pub fn mailer(&self) -> Option<&dyn Mailer> {
        self.mailer.as_deref()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_state_has_no_mailer_by_default() {
        let state = test_helpers::test_app_state();
        assert!(state.mailer().is_none());
        assert_eq!(state.storage.max_bytes(), 1024);
    }

    #[tokio::test]
    async fn inbox_reaches_subscribers() {
        let state = test_helpers::test_app_state();
        let mut rx = state.inbox.subscribe();
        let event = InboxEvent::NewMessage { id: uuid::Uuid::nil(), name: "Lina".into() };
        state.inbox.send(event.clone()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn clones_share_limiters() {
        let state = test_helpers::test_app_state();
        let clone = state.clone();
        let limit = state.contact_limiter.policy().limit;
        for _ in 0..limit {
            state.contact_limiter.check_and_record("10.0.0.1").unwrap();
        }
        assert!(clone.contact_limiter.check_and_record("10.0.0.1").is_err());
    }
}
