//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::phone::mask_phone;

/// A registered member, as seen by the authentication core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Full name (English).
    pub full_name: String,
    /// Full name (Bangla).
    pub full_name_bn: Option<String>,
    /// National ID number.
    #[serde(skip_serializing)]
    pub nid: Option<String>,
    /// Login phone number, `+880` followed by ten digits.
    pub phone: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Argon2id password hash (PHC string).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account may log in at all.
    pub is_active: bool,
    /// When the phone number was verified.
    pub verified_at: Option<DateTime<Utc>>,
    /// Consecutive failed login attempts since the last success.
    #[serde(skip_serializing)]
    pub failed_login_attempts: i32,
    /// Account locked until this time (if locked).
    #[serde(skip_serializing)]
    pub locked_until: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the lockout window is still open at `now`.
    ///
    /// A `locked_until` in the past means the lock lapsed; nothing clears it
    /// until the next successful login.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Whether the account is locked right now.
    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now())
    }

    /// Whether the phone number has been verified.
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Phone number safe for logs.
    pub fn masked_phone(&self) -> String {
        mask_phone(&self.phone)
    }

    /// Public projection returned to clients.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            full_name_bn: self.full_name_bn.clone(),
            phone: self.masked_phone(),
            email: self.email.clone(),
            is_active: self.is_active,
            is_verified: self.is_verified(),
            created_at: self.created_at,
        }
    }
}

/// Public user profile. Never carries the hash or lockout counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: Uuid,
    /// Full name (English).
    pub full_name: String,
    /// Full name (Bangla).
    pub full_name_bn: Option<String>,
    /// Masked phone number.
    pub phone: String,
    /// Email address.
    pub email: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the phone number is verified.
    pub is_verified: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Counter state after an atomic failed-attempt increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct FailedAttemptOutcome {
    /// Consecutive failures including this one.
    pub failed_login_attempts: i32,
    /// Lock expiry, set when the threshold was reached.
    pub locked_until: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            full_name: "Rahim Uddin".to_string(),
            full_name_bn: None,
            nid: Some("1234567890".to_string()),
            phone: "+8801700000000".to_string(),
            email: None,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            is_active: true,
            verified_at: None,
            failed_login_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn lock_lapses_once_deadline_passes() {
        let now = Utc::now();
        let mut u = user();
        assert!(!u.is_locked_at(now));

        u.locked_until = Some(now + Duration::minutes(30));
        assert!(u.is_locked_at(now));
        assert!(!u.is_locked_at(now + Duration::minutes(31)));
    }

    #[test]
    fn profile_hides_secrets() {
        let u = user();
        let json = serde_json::to_value(u.profile()).unwrap();
        assert_eq!(json["phone"], "+88017***0000");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("failed_login_attempts").is_none());
    }

    #[test]
    fn serialized_user_omits_hash_and_nid() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("nid").is_none());
    }
}
