//! Cache provider trait backing the session store.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Expiring key-value backend (Redis or in-memory).
///
/// Values are plain strings. The provider is responsible for key prefixing
/// and TTL enforcement; an absent key and an expired key are the same thing.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL. A zero TTL is clamped to one second.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Delete all keys matching a glob pattern (e.g. `"session:42:*"`).
    ///
    /// Implementations iterate incrementally; keys written concurrently with
    /// the sweep may survive it. Returns the number of keys deleted.
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Short backend name for logs and health output.
    fn provider_name(&self) -> &'static str;
}
