use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use storefront_core::AppError;
use storefront_models::password_recovery::PasswordRecovery;

/// Storage of recovery codes.
#[async_trait]
pub trait RecoveryCodeRepository: Send + Sync {
    /// Stores a new code and invalidates the user's previous unused codes.
    /// Returns `None` without changes when `code` is already taken.
    async fn create(
        &self,
        store_user_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<PasswordRecovery>, AppError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<PasswordRecovery>, AppError>;

    /// Marks the code used and stores the new password hash. Returns `false`
    /// when the code was redeemed concurrently.
    async fn redeem(
        &self,
        recovery: &PasswordRecovery,
        password_hash: &str,
    ) -> Result<bool, AppError>;
}

pub struct PgRecoveryCodeRepository {
    db: PgPool,
}

impl PgRecoveryCodeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecoveryCodeRepository for PgRecoveryCodeRepository {
    #[instrument(skip(self, code))]
    async fn create(
        &self,
        store_user_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<PasswordRecovery>, AppError> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "UPDATE password_recoveries SET used_at = NOW() WHERE store_user_id = $1 AND used_at IS NULL",
        )
        .bind(store_user_id)
        .execute(&mut *tx)
        .await?;

        let inserted = sqlx::query_as::<_, PasswordRecovery>(
            r#"INSERT INTO password_recoveries (store_user_id, code, expires_at)
               VALUES ($1, $2, $3)
               RETURNING id, store_user_id, code, expires_at, used_at"#,
        )
        .bind(store_user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await;

        let recovery = match inserted {
            Ok(recovery) => recovery,
            // dropping the transaction rolls back the invalidation above
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(Some(recovery))
    }

    #[instrument(skip(self, code))]
    async fn find_by_code(&self, code: &str) -> Result<Option<PasswordRecovery>, AppError> {
        let recovery = sqlx::query_as::<_, PasswordRecovery>(
            r#"SELECT id, store_user_id, code, expires_at, used_at
               FROM password_recoveries WHERE code = $1"#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?;

        Ok(recovery)
    }

    #[instrument(skip(self, recovery, password_hash), fields(recovery_id = recovery.id))]
    async fn redeem(
        &self,
        recovery: &PasswordRecovery,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query(
            "UPDATE password_recoveries SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(recovery.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE store_users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(recovery.store_user_id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
