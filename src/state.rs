use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use storefront_config::{
    CorsConfig, DatabaseConfig, EmailConfig, JwtConfig, ServerConfig, StorageConfig,
};
use storefront_core::{FileStorage, LocalFileStorage};
use storefront_db::{init_db_pool, run_migrations};

use crate::metrics::init_metrics;
use crate::modules::auth::{AuthStoreUserRepository, AuthStoreUserService};
use crate::modules::email_validation::PgEmailValidationTokenRepository;
use crate::modules::menus::{MenuRepository, PgMenuRepository};
use crate::modules::password_recovery::{
    PasswordRecoveryRepository, PasswordRecoveryService, PgRecoveryCodeRepository,
};
use crate::modules::store_users::{PgStoreUserRepository, StoreUserRepository};
use crate::modules::stores::{PgStoreRepository, StoreRepository};
use crate::utils::email::{EmailSender, LogEmailSender, SmtpEmailSender};

/// Shared by every handler. Repositories are trait objects so tests can
/// build the state from in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    pub storage_config: StorageConfig,
    pub menus: Arc<dyn MenuRepository>,
    pub auth: Arc<dyn AuthStoreUserRepository>,
    pub password_recovery: Arc<dyn PasswordRecoveryRepository>,
    pub stores: Arc<dyn StoreRepository>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Reads configuration, connects and migrates the database, and wires
    /// the Postgres repositories into the services.
    pub async fn init() -> anyhow::Result<Self> {
        let jwt_config = JwtConfig::from_env();
        let cors_config = CorsConfig::from_env();
        let server_config = ServerConfig::from_env();
        let storage_config = StorageConfig::from_env();
        let email_config = EmailConfig::from_env();
        let database_config = DatabaseConfig::from_env()?;

        let db = init_db_pool(&database_config)
            .await
            .context("failed to connect to the database")?;
        run_migrations(&db)
            .await
            .context("failed to run database migrations")?;

        let email_sender: Arc<dyn EmailSender> = if email_config.enabled {
            Arc::new(SmtpEmailSender::new(email_config.clone())?)
        } else {
            info!("SMTP disabled, outgoing email will be logged");
            Arc::new(LogEmailSender)
        };

        let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::with_max_size(
            storage_config.base_dir.clone(),
            storage_config.base_url.clone(),
            storage_config.max_bytes,
        ));

        let stores: Arc<dyn StoreRepository> =
            Arc::new(PgStoreRepository::new(db.clone(), storage));
        let users: Arc<dyn StoreUserRepository> = Arc::new(PgStoreUserRepository::new(db.clone()));

        let auth = AuthStoreUserService::new(
            stores.clone(),
            users.clone(),
            Arc::new(PgEmailValidationTokenRepository::new(db.clone())),
            email_sender.clone(),
            jwt_config.clone(),
            email_config.frontend_url.clone(),
        );
        let password_recovery = PasswordRecoveryService::new(
            users,
            Arc::new(PgRecoveryCodeRepository::new(db.clone())),
            email_sender,
            email_config.frontend_url,
        );

        let metrics = if server_config.metrics_enabled {
            Some(init_metrics()?)
        } else {
            None
        };

        Ok(Self {
            jwt_config,
            cors_config,
            server_config,
            storage_config,
            menus: Arc::new(PgMenuRepository::new(db)),
            auth: Arc::new(auth),
            password_recovery: Arc::new(password_recovery),
            stores,
            metrics,
        })
    }
}
