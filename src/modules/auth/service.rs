use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{debug, error, instrument, warn};

use storefront_auth::create_access_token;
use storefront_config::JwtConfig;
use storefront_core::AppError;
use storefront_models::auth::{AuthResponse, LoginDto, RegisterStoreUserDto};
use storefront_models::email_validation::EMAIL_VALIDATION_TTL_HOURS;
use storefront_models::store_users::StoreUser;

use crate::metrics::{track_email_sent, track_login, track_store_user_registered};
use crate::modules::email_validation::repository::EmailValidationTokenRepository;
use crate::modules::store_users::repository::StoreUserRepository;
use crate::modules::stores::repository::StoreRepository;
use crate::utils::email::{EmailMessage, EmailSender};
use crate::utils::password::{hash_password_blocking, verify_password_blocking};
use crate::utils::tokens::generate_token;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Store-user authentication operations exposed to the controller.
#[async_trait]
pub trait AuthStoreUserRepository: Send + Sync {
    async fn sign_up_with_email_and_password(
        &self,
        dto: RegisterStoreUserDto,
    ) -> Result<AuthResponse, AppError>;

    async fn sign_in_with_email_and_password(
        &self,
        dto: LoginDto,
    ) -> Result<AuthResponse, AppError>;

    async fn me(&self, store_id: i64, user_id: i64) -> Result<StoreUser, AppError>;

    async fn resend_email_validation(&self, store_id: i64, user_id: i64) -> Result<(), AppError>;

    /// Succeeds for unknown or verified emails without sending anything.
    async fn resend_email_validation_by_email(&self, email: &str) -> Result<(), AppError>;

    /// Whether `email` is still free to register.
    async fn is_valid_email(&self, email: &str) -> Result<bool, AppError>;

    async fn verify_email_validation_integrity_by_token(&self, token: &str)
    -> Result<(), AppError>;
}

pub struct AuthStoreUserService {
    stores: Arc<dyn StoreRepository>,
    users: Arc<dyn StoreUserRepository>,
    tokens: Arc<dyn EmailValidationTokenRepository>,
    email_sender: Arc<dyn EmailSender>,
    jwt_config: JwtConfig,
    frontend_url: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthStoreUserService {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        users: Arc<dyn StoreUserRepository>,
        tokens: Arc<dyn EmailValidationTokenRepository>,
        email_sender: Arc<dyn EmailSender>,
        jwt_config: JwtConfig,
        frontend_url: String,
    ) -> Self {
        Self {
            stores,
            users,
            tokens,
            email_sender,
            jwt_config,
            frontend_url,
        }
    }

    fn auth_response(&self, user: StoreUser) -> Result<AuthResponse, AppError> {
        let access_token =
            create_access_token(user.id, &user.email, user.store_id, &self.jwt_config)?;
        Ok(AuthResponse { access_token, user })
    }

    /// Issues a fresh validation token for `user` and emails the link.
    async fn send_validation_email(&self, user: &StoreUser) -> Result<(), AppError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(EMAIL_VALIDATION_TTL_HOURS);
        self.tokens.create(user.id, &token, expires_at).await?;

        let link = format!(
            "{}/email-validation/{}",
            self.frontend_url.trim_end_matches('/'),
            token
        );
        let message = EmailMessage::email_validation(&user.email, &user.name, &link);

        let result = self.email_sender.send(message).await;
        track_email_sent("email_validation", result.is_ok());
        result.map_err(AppError::from)
    }
}

#[async_trait]
impl AuthStoreUserRepository for AuthStoreUserService {
    #[instrument(skip(self, dto))]
    async fn sign_up_with_email_and_password(
        &self,
        dto: RegisterStoreUserDto,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&dto.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = hash_password_blocking(dto.password).await?;
        let store = self.stores.create(&dto.store_name).await?;

        let user = match self
            .users
            .create(store.id, dto.name.trim(), &email, &password_hash)
            .await
        {
            Ok(user) => user,
            Err(err) => {
                if let Err(cleanup) = self.stores.delete(store.id).await {
                    error!(error = ?cleanup.error, store_id = store.id, "Failed to remove store after failed registration");
                }
                return Err(err);
            }
        };

        if let Err(e) = self.send_validation_email(&user).await {
            warn!(error = %e.error, user_id = user.id, "Failed to send email validation");
        }

        track_store_user_registered();
        self.auth_response(user)
    }

    #[instrument(skip(self, dto))]
    async fn sign_in_with_email_and_password(
        &self,
        dto: LoginDto,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&dto.email);
        let Some(credentials) = self.users.find_credentials_by_email(&email).await? else {
            track_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password_blocking(dto.password, credentials.password).await? {
            track_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        track_login(true);
        self.auth_response(credentials.user)
    }

    #[instrument(skip(self))]
    async fn me(&self, store_id: i64, user_id: i64) -> Result<StoreUser, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.store_id == store_id)
            .ok_or_else(|| AppError::not_found("Store user not found"))
    }

    #[instrument(skip(self))]
    async fn resend_email_validation(&self, store_id: i64, user_id: i64) -> Result<(), AppError> {
        let user = self.me(store_id, user_id).await?;
        if user.is_email_verified() {
            return Err(AppError::conflict("Email already validated"));
        }

        self.send_validation_email(&user).await
    }

    #[instrument(skip(self, email))]
    async fn resend_email_validation_by_email(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        match self.users.find_by_email(&email).await? {
            Some(user) if !user.is_email_verified() => {
                if let Err(e) = self.send_validation_email(&user).await {
                    warn!(error = %e.error, user_id = user.id, "Failed to resend email validation");
                }
            }
            _ => debug!("No unverified account for email validation resend"),
        }

        Ok(())
    }

    #[instrument(skip(self, email))]
    async fn is_valid_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .is_none())
    }

    #[instrument(skip(self, token))]
    async fn verify_email_validation_integrity_by_token(
        &self,
        token: &str,
    ) -> Result<(), AppError> {
        let token = self
            .tokens
            .find_by_token(token.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Email validation token not found"))?;

        token.ensure_usable(Utc::now())?;

        if !self.tokens.consume(&token).await? {
            return Err(AppError::conflict("Email validation token already used"));
        }

        Ok(())
    }
}
