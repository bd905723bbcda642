use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use storefront_core::AppError;
use storefront_models::email_validation::EmailValidationToken;

#[async_trait]
pub trait EmailValidationTokenRepository: Send + Sync {
    async fn create(
        &self,
        store_user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailValidationToken, AppError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<EmailValidationToken>, AppError>;

    /// Marks the token used and its user verified. Returns `false` when the
    /// token was consumed concurrently.
    async fn consume(&self, token: &EmailValidationToken) -> Result<bool, AppError>;
}

pub struct PgEmailValidationTokenRepository {
    db: PgPool,
}

impl PgEmailValidationTokenRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmailValidationTokenRepository for PgEmailValidationTokenRepository {
    #[instrument(skip(self, token))]
    async fn create(
        &self,
        store_user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailValidationToken, AppError> {
        let token = sqlx::query_as::<_, EmailValidationToken>(
            r#"INSERT INTO email_validation_tokens (store_user_id, token, expires_at)
               VALUES ($1, $2, $3)
               RETURNING id, store_user_id, token, expires_at, used_at"#,
        )
        .bind(store_user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await?;

        Ok(token)
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> Result<Option<EmailValidationToken>, AppError> {
        let token = sqlx::query_as::<_, EmailValidationToken>(
            r#"SELECT id, store_user_id, token, expires_at, used_at
               FROM email_validation_tokens WHERE token = $1"#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        Ok(token)
    }

    #[instrument(skip(self, token), fields(token_id = token.id))]
    async fn consume(&self, token: &EmailValidationToken) -> Result<bool, AppError> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query(
            "UPDATE email_validation_tokens SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(token.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"UPDATE store_users
               SET email_verified_at = COALESCE(email_verified_at, NOW()), updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(token.store_user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
