//! Credential repository.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bjdms_core::error::{AppError, ErrorKind};
use bjdms_core::result::AppResult;
use bjdms_entity::jurisdiction::JurisdictionScope;
use bjdms_entity::user::{CredentialStore, FailedAttemptOutcome, User};

const USER_COLUMNS: &str = "id, full_name, full_name_bn, nid, phone, email, password_hash, \
     is_active, verified_at, failed_login_attempts, locked_until, created_at, updated_at, deleted_at";

/// Postgres-backed credential store over the `users` table.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn get_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by phone", e)
            })
    }

    async fn increment_failed_attempts(
        &self,
        phone: &str,
        max_attempts: i32,
        lockout: Duration,
    ) -> AppResult<FailedAttemptOutcome> {
        let lockout_seconds = i64::try_from(lockout.as_secs()).unwrap_or(i64::MAX);

        sqlx::query_as::<_, FailedAttemptOutcome>(
            r#"UPDATE users
               SET failed_login_attempts = failed_login_attempts + 1,
                   locked_until = CASE
                       WHEN failed_login_attempts + 1 >= $2
                       THEN NOW() + ($3::float8 * INTERVAL '1 second')
                       ELSE locked_until
                   END,
                   updated_at = NOW()
               WHERE phone = $1 AND deleted_at IS NULL
               RETURNING failed_login_attempts, locked_until"#,
        )
        .bind(phone)
        .bind(max_attempts)
        .bind(lockout_seconds)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record failed login", e)
        })?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn reset_failed_attempts(&self, phone: &str) -> AppResult<()> {
        sqlx::query(
            r#"UPDATE users
               SET failed_login_attempts = 0, locked_until = NULL, updated_at = NOW()
               WHERE phone = $1 AND deleted_at IS NULL"#,
        )
        .bind(phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reset failed logins", e)
        })?;
        Ok(())
    }

    async fn get_user_auth_details(&self, user_id: Uuid) -> AppResult<JurisdictionScope> {
        sqlx::query_as::<_, JurisdictionScope>(
            r#"SELECT jurisdiction_id, COALESCE(position_rank, 999) AS rank
               FROM users
               WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load authorization details", e)
        })?
        .ok_or_else(|| AppError::not_found("User authorization details not found"))
    }
}
