//! Sliding window limiter for the login endpoint.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::RETRY_AFTER;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use bjdms_core::config::rate_limit::RateLimitConfig;
use bjdms_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// Per-client sliding window of recent attempt timestamps.
#[derive(Debug)]
pub struct LoginRateLimiter {
    enabled: bool,
    limit: usize,
    window: Duration,
    attempts: DashMap<String, VecDeque<Instant>>,
}

impl LoginRateLimiter {
    /// Creates a limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            limit: config.login_limit as usize,
            window: config.window(),
            attempts: DashMap::new(),
        }
    }

    /// Record an attempt for `key`.
    ///
    /// Returns the time until the oldest attempt leaves the window when the
    /// client is over its limit.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        if !self.enabled {
            return Ok(());
        }

        let mut entry = self.attempts.entry(key.to_string()).or_default();
        let window = &mut *entry;
        while window
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            window.pop_front();
        }

        if window.len() >= self.limit {
            let retry_after = window
                .front()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            return Err(retry_after);
        }

        window.push_back(now);
        Ok(())
    }

    /// Drop clients whose attempts have all left the window.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.attempts.len();
        self.attempts.retain(|_, window| {
            window
                .back()
                .is_some_and(|t| now.duration_since(*t) < self.window)
        });
        before.saturating_sub(self.attempts.len())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }

    /// Run [`sweep`](Self::sweep) every `interval` until `shutdown` flips.
    pub fn spawn_sweeper(
        limiter: Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = limiter.sweep();
                        if removed > 0 {
                            debug!(removed, "Swept idle rate limit entries");
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }
}

/// Rejects a client with 429 once it exceeds the login limit.
pub async fn login_rate_limit(
    State(state): State<AppState>,
    client: ClientInfo,
    request: Request,
    next: Next,
) -> Response {
    match state.login_limiter.check(client.rate_limit_key()) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            let secs = retry_after.as_secs().max(1);
            warn!(
                ip = client.rate_limit_key(),
                retry_after_secs = secs,
                "Login rate limit exceeded"
            );
            let mut response = ApiError(AppError::rate_limited(
                "Too many login attempts, try again later",
            ))
            .into_response();
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
    }
}
