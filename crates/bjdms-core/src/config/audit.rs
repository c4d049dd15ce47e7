//! Audit pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounded audit queue and its worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Events buffered before new ones are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Number of tasks draining the queue.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Deadline for a single audit write, in milliseconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,
}

impl AuditConfig {
    /// Per-write deadline.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            workers: default_workers(),
            write_timeout_ms: default_write_timeout(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_workers() -> usize {
    2
}

fn default_write_timeout() -> u64 {
    5000
}
