//! Domain events emitted by the authentication flows.
//!
//! Events are handed to the audit pipeline, which persists them as audit
//! log rows. Emitting an event never blocks or fails the emitting request.

pub mod auth;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use auth::{AuthEvent, LoginFailureReason};

/// Wrapper for a domain event with request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if known).
    pub actor_id: Option<Uuid>,
    /// Client IP address of the originating request.
    pub ip_address: Option<String>,
    /// Client User-Agent of the originating request.
    pub user_agent: Option<String>,
    /// The event payload.
    pub payload: AuthEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<Uuid>, payload: AuthEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            ip_address: None,
            user_agent: None,
            payload,
        }
    }

    /// Attach the client address and user agent.
    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}
