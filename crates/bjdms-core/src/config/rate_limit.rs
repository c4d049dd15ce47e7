//! Login rate limiting configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-client sliding window on `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether the limiter is active.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Attempts allowed per window.
    #[serde(default = "default_login_limit")]
    pub login_limit: u32,
    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    /// How often idle clients are swept from memory, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl RateLimitConfig {
    /// Window length.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    /// Sweep period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            login_limit: default_login_limit(),
            window_seconds: default_window(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_login_limit() -> u32 {
    10
}

fn default_window() -> u64 {
    15 * 60
}

fn default_sweep_interval() -> u64 {
    60
}
