//! # bjdms-cache
//!
//! Expiring key-value backends for the session store. Two modes:
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry TTLs
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis)
//!   crate with a reconnecting connection manager
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;

use std::time::Duration;

/// Shortest TTL a backend will accept; zero would mean "never expires" in Redis.
pub(crate) const MIN_TTL: Duration = Duration::from_secs(1);

pub(crate) fn clamp_ttl(ttl: Duration) -> Duration {
    ttl.max(MIN_TTL)
}
