use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use storefront_core::AppError;
use storefront_models::store_users::{StoreUser, StoreUserCredentials};

const STORE_USER_COLUMNS: &str =
    "id, store_id, name, email, email_verified_at, created_at, updated_at";

#[async_trait]
pub trait StoreUserRepository: Send + Sync {
    /// Fails with 409 "Email already registered" on a duplicate email.
    async fn create(
        &self,
        store_id: i64,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<StoreUser, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<StoreUser>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<StoreUser>, AppError>;

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoreUserCredentials>, AppError>;
}

pub struct PgStoreUserRepository {
    db: PgPool,
}

impl PgStoreUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreUserRepository for PgStoreUserRepository {
    #[instrument(skip(self, name, email, password_hash))]
    async fn create(
        &self,
        store_id: i64,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<StoreUser, AppError> {
        sqlx::query_as::<_, StoreUser>(&format!(
            "INSERT INTO store_users (store_id, name, email, password)
             VALUES ($1, $2, $3, $4) RETURNING {}",
            STORE_USER_COLUMNS
        ))
        .bind(store_id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict("Email already registered");
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<StoreUser>, AppError> {
        let user = sqlx::query_as::<_, StoreUser>(&format!(
            "SELECT {} FROM store_users WHERE id = $1",
            STORE_USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<StoreUser>, AppError> {
        let user = sqlx::query_as::<_, StoreUser>(&format!(
            "SELECT {} FROM store_users WHERE email = $1",
            STORE_USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoreUserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, StoreUserCredentials>(&format!(
            "SELECT {}, password FROM store_users WHERE email = $1",
            STORE_USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(credentials)
    }
}
