//! In-memory collaborators for tests.
//!
//! Enabled for this crate's unit tests and, through the `testing` feature,
//! for integration tests of downstream crates.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::result::AppResult;
use bjdms_core::traits::CacheProvider;
use bjdms_entity::audit::{AuditSink, CreateAuditLogEntry};
use bjdms_entity::jurisdiction::{JurisdictionHierarchy, JurisdictionScope};
use bjdms_entity::user::{CredentialStore, FailedAttemptOutcome, User};

/// Active, unverified user with the given phone and hash.
pub fn sample_user(phone: &str, password_hash: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        full_name: "Test Member".to_string(),
        full_name_bn: None,
        nid: None,
        phone: phone.to_string(),
        email: None,
        password_hash: password_hash.to_string(),
        is_active: true,
        verified_at: None,
        failed_login_attempts: 0,
        locked_until: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Credential store keyed by phone.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: DashMap<String, User>,
    scopes: DashMap<Uuid, JurisdictionScope>,
}

impl InMemoryCredentialStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: User) {
        self.users.insert(user.phone.clone(), user);
    }

    /// Insert a [`sample_user`] and return a copy of it.
    pub fn insert_user(&self, phone: &str, password_hash: &str) -> User {
        let user = sample_user(phone, password_hash);
        self.insert(user.clone());
        user
    }

    /// Current state of a user.
    pub fn user(&self, phone: &str) -> Option<User> {
        self.users.get(phone).map(|u| u.clone())
    }

    /// Apply a change to a stored user.
    pub fn update(&self, phone: &str, change: impl FnOnce(&mut User)) {
        if let Some(mut user) = self.users.get_mut(phone) {
            change(&mut user);
        }
    }

    /// Assign jurisdiction and rank to a user.
    pub fn set_scope(&self, user_id: Uuid, scope: JurisdictionScope) {
        self.scopes.insert(user_id, scope);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .get(phone)
            .filter(|u| u.deleted_at.is_none())
            .map(|u| u.clone()))
    }

    async fn increment_failed_attempts(
        &self,
        phone: &str,
        max_attempts: i32,
        lockout: Duration,
    ) -> AppResult<FailedAttemptOutcome> {
        let mut user = self
            .users
            .get_mut(phone)
            .filter(|u| u.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("User not found"))?;

        user.failed_login_attempts += 1;
        if user.failed_login_attempts >= max_attempts {
            let lockout = chrono::Duration::from_std(lockout)
                .map_err(|e| AppError::internal(format!("Lockout out of range: {e}")))?;
            user.locked_until = Some(Utc::now() + lockout);
        }
        user.updated_at = Utc::now();

        Ok(FailedAttemptOutcome {
            failed_login_attempts: user.failed_login_attempts,
            locked_until: user.locked_until,
        })
    }

    async fn reset_failed_attempts(&self, phone: &str) -> AppResult<()> {
        if let Some(mut user) = self.users.get_mut(phone) {
            user.failed_login_attempts = 0;
            user.locked_until = None;
        }
        Ok(())
    }

    async fn get_user_auth_details(&self, user_id: Uuid) -> AppResult<JurisdictionScope> {
        let known = self
            .users
            .iter()
            .any(|u| u.id == user_id && u.deleted_at.is_none());
        if !known {
            return Err(AppError::not_found("User authorization details not found"));
        }
        Ok(self
            .scopes
            .get(&user_id)
            .map(|s| *s)
            .unwrap_or_default())
    }
}

/// Jurisdiction tree as a child-to-parent map.
#[derive(Debug, Default)]
pub struct InMemoryHierarchy {
    parents: DashMap<Uuid, Option<Uuid>>,
}

impl InMemoryHierarchy {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (`None` for a root).
    pub fn insert(&self, id: Uuid, parent: Option<Uuid>) {
        self.parents.insert(id, parent);
    }
}

#[async_trait]
impl JurisdictionHierarchy for InMemoryHierarchy {
    async fn parent_of(&self, node: Uuid) -> AppResult<Option<Uuid>> {
        Ok(self.parents.get(&node).and_then(|p| *p))
    }
}

/// Audit sink that keeps every entry, optionally after a delay per write.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    entries: Mutex<Vec<CreateAuditLogEntry>>,
    delay: Option<Duration>,
}

impl RecordingAuditSink {
    /// Sink that records immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that sleeps for `delay` before each write.
    pub fn slow(delay: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            delay: Some(delay),
        }
    }

    /// Entries written so far.
    pub async fn entries(&self) -> Vec<CreateAuditLogEntry> {
        self.entries.lock().await.clone()
    }

    /// Actions written so far, in order.
    pub async fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn create_audit_log(&self, entry: CreateAuditLogEntry) -> AppResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

/// Cache that errors on every call, or never answers.
#[derive(Debug, Clone)]
pub struct BrokenCache {
    hang: bool,
}

impl BrokenCache {
    /// Every call returns a cache error.
    pub fn failing() -> Self {
        Self { hang: false }
    }

    /// Every call blocks forever.
    pub fn hanging() -> Self {
        Self { hang: true }
    }

    async fn fail<T>(&self) -> AppResult<T> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        Err(AppError::new(ErrorKind::Cache, "Cache backend unreachable"))
    }
}

#[async_trait]
impl CacheProvider for BrokenCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        self.fail().await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        self.fail().await
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        self.fail().await
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        self.fail().await
    }

    async fn delete_pattern(&self, _pattern: &str) -> AppResult<u64> {
        self.fail().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.fail().await
    }

    fn provider_name(&self) -> &'static str {
        "broken"
    }
}

/// Shared handles to the in-memory collaborators.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStores {
    /// Users and scopes.
    pub credentials: Arc<InMemoryCredentialStore>,
    /// Jurisdiction tree.
    pub hierarchy: Arc<InMemoryHierarchy>,
    /// Recorded audit entries.
    pub audit: Arc<RecordingAuditSink>,
}
