use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use storefront_core::AppError;
use storefront_core::file_storage::{FileStorage, StorageError};
use storefront_models::stores::{Store, slugify};

use crate::utils::tokens::generate_token;

const STORE_COLUMNS: &str = "id, name, slug, logo_key, logo_url, created_at, updated_at";

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Store, AppError>;

    async fn find_by_id(&self, store_id: i64) -> Result<Store, AppError>;

    async fn update_logo(
        &self,
        store_id: i64,
        content_type: &str,
        content: &[u8],
    ) -> Result<Store, AppError>;

    async fn delete(&self, store_id: i64) -> Result<(), AppError>;
}

/// First of `base`, `base-2`, `base-3`, ... not present in `taken`.
pub fn next_available_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }

    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| format!("{}-{}", base, generate_token()))
}

fn logo_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Writes the logo under a fresh key and returns `(key, url)`.
pub async fn store_logo(
    storage: &dyn FileStorage,
    store_id: i64,
    content_type: &str,
    content: &[u8],
) -> Result<(String, String), AppError> {
    let key = format!(
        "stores/{}/logo-{}.{}",
        store_id,
        &generate_token()[..16],
        logo_extension(content_type)
    );

    let key = storage
        .save(&key, content_type, content)
        .await
        .map_err(|e| match e {
            StorageError::InvalidMimeType { .. } => {
                AppError::unsupported_media_type("Unsupported logo type")
            }
            StorageError::InvalidFileSize { .. } => {
                AppError::payload_too_large("Logo exceeds maximum size")
            }
            other => other.into_app_error(),
        })?;
    let url = storage.get_url(&key).map_err(StorageError::into_app_error)?;

    Ok((key, url))
}

/// Saves the logo and hands `(key, url)` to `persist`. When `persist` fails the
/// saved file is removed before the error is returned.
pub async fn replace_logo<F, Fut>(
    storage: &dyn FileStorage,
    store_id: i64,
    content_type: &str,
    content: &[u8],
    persist: F,
) -> Result<Store, AppError>
where
    F: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<Store, AppError>>,
{
    let (key, url) = store_logo(storage, store_id, content_type, content).await?;

    match persist(key.clone(), url).await {
        Ok(store) => Ok(store),
        Err(err) => {
            if let Err(e) = storage.delete(&key).await {
                warn!(error = %e, key = %key, "Failed to remove logo after failed update");
            }
            Err(err)
        }
    }
}

pub struct PgStoreRepository {
    db: PgPool,
    storage: Arc<dyn FileStorage>,
}

impl PgStoreRepository {
    pub fn new(db: PgPool, storage: Arc<dyn FileStorage>) -> Self {
        Self { db, storage }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    #[instrument(skip(self))]
    async fn create(&self, name: &str) -> Result<Store, AppError> {
        let base = slugify(name);
        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM stores WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&base)
        .fetch_all(&self.db)
        .await?;
        let slug = next_available_slug(&base, &taken);

        let store = sqlx::query_as::<_, Store>(&format!(
            "INSERT INTO stores (name, slug) VALUES ($1, $2) RETURNING {}",
            STORE_COLUMNS
        ))
        .bind(name.trim())
        .bind(&slug)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict("A store with this name is being created, try again");
            }
            AppError::from(e)
        })?;

        Ok(store)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, store_id: i64) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(&format!(
            "SELECT {} FROM stores WHERE id = $1",
            STORE_COLUMNS
        ))
        .bind(store_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Store not found"))
    }

    #[instrument(skip(self, content), fields(size = content.len()))]
    async fn update_logo(
        &self,
        store_id: i64,
        content_type: &str,
        content: &[u8],
    ) -> Result<Store, AppError> {
        let current = self.find_by_id(store_id).await?;

        let store = replace_logo(
            self.storage.as_ref(),
            store_id,
            content_type,
            content,
            |key, url| async move {
                sqlx::query_as::<_, Store>(&format!(
                    "UPDATE stores SET logo_key = $2, logo_url = $3, updated_at = NOW()
                     WHERE id = $1 RETURNING {}",
                    STORE_COLUMNS
                ))
                .bind(store_id)
                .bind(key)
                .bind(url)
                .fetch_one(&self.db)
                .await
                .map_err(AppError::from)
            },
        )
        .await?;

        if let Some(old_key) = current.logo_key
            && store.logo_key.as_deref() != Some(old_key.as_str())
            && let Err(e) = self.storage.delete(&old_key).await
        {
            warn!(error = %e, key = %old_key, "Failed to delete previous logo");
        }

        Ok(store)
    }

    #[instrument(skip(self))]
    async fn delete(&self, store_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(store_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
