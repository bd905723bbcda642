use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};

use storefront_core::AppError;
use storefront_models::password_recovery::{
    PasswordRecovery, RECOVERY_CODE_LENGTH, RECOVERY_CODE_TTL_MINUTES, RecoveryCodeValidResponse,
};

use crate::metrics::track_email_sent;
use crate::modules::password_recovery::repository::RecoveryCodeRepository;
use crate::modules::store_users::repository::StoreUserRepository;
use crate::utils::email::{EmailMessage, EmailSender};
use crate::utils::password::hash_password_blocking;
use crate::utils::tokens::generate_recovery_code;

/// Fresh codes tried before giving up on a run of collisions.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Password recovery operations exposed to the controller.
#[async_trait]
pub trait PasswordRecoveryRepository: Send + Sync {
    /// Issues and emails a recovery code when the account exists. Succeeds
    /// either way so the response does not reveal registered emails.
    async fn generate(&self, email: &str) -> Result<(), AppError>;

    async fn change_password(&self, code: &str, password: &str) -> Result<(), AppError>;

    async fn validate(&self, code: &str) -> Result<RecoveryCodeValidResponse, AppError>;
}

pub struct PasswordRecoveryService {
    users: Arc<dyn StoreUserRepository>,
    codes: Arc<dyn RecoveryCodeRepository>,
    email_sender: Arc<dyn EmailSender>,
    frontend_url: String,
}

impl PasswordRecoveryService {
    pub fn new(
        users: Arc<dyn StoreUserRepository>,
        codes: Arc<dyn RecoveryCodeRepository>,
        email_sender: Arc<dyn EmailSender>,
        frontend_url: String,
    ) -> Self {
        Self {
            users,
            codes,
            email_sender,
            frontend_url,
        }
    }

    fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Stores a fresh code for the user, drawing again on a collision.
    async fn issue_code(&self, store_user_id: i64) -> Result<PasswordRecovery, AppError> {
        let expires_at = Utc::now() + Duration::minutes(RECOVERY_CODE_TTL_MINUTES);

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_recovery_code(RECOVERY_CODE_LENGTH);
            if let Some(recovery) = self.codes.create(store_user_id, &code, expires_at).await? {
                return Ok(recovery);
            }
            debug!(attempt, "Recovery code collision, drawing a new one");
        }

        Err(AppError::internal_error(format!(
            "No unique recovery code after {} attempts",
            MAX_CODE_ATTEMPTS
        )))
    }

    async fn find_usable(&self, code: &str) -> Result<PasswordRecovery, AppError> {
        let recovery = self
            .codes
            .find_by_code(&Self::normalize_code(code))
            .await?
            .ok_or_else(|| AppError::not_found("Recovery code not found"))?;

        recovery.ensure_usable(Utc::now())?;
        Ok(recovery)
    }
}

#[async_trait]
impl PasswordRecoveryRepository for PasswordRecoveryService {
    #[instrument(skip(self, email))]
    async fn generate(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            debug!("Password recovery requested for unknown email");
            return Ok(());
        };

        let code = self.issue_code(user.id).await?.code;

        let link = format!(
            "{}/password-recovery/{}",
            self.frontend_url.trim_end_matches('/'),
            code
        );
        let message = EmailMessage::password_recovery(&user.email, &user.name, &code, &link);
        match self.email_sender.send(message).await {
            Ok(()) => track_email_sent("password_recovery", true),
            Err(e) => {
                track_email_sent("password_recovery", false);
                warn!(error = %e, user_id = user.id, "Failed to send password recovery email");
            }
        }

        Ok(())
    }

    #[instrument(skip(self, code, password))]
    async fn change_password(&self, code: &str, password: &str) -> Result<(), AppError> {
        let recovery = self.find_usable(code).await?;
        let password_hash = hash_password_blocking(password.to_string()).await?;

        if !self.codes.redeem(&recovery, &password_hash).await? {
            return Err(AppError::conflict("Recovery code already used"));
        }

        if let Some(user) = self.users.find_by_id(recovery.store_user_id).await? {
            let message = EmailMessage::password_changed(&user.email, &user.name);
            match self.email_sender.send(message).await {
                Ok(()) => track_email_sent("password_changed", true),
                Err(e) => {
                    track_email_sent("password_changed", false);
                    warn!(error = %e, user_id = user.id, "Failed to send password change confirmation");
                }
            }
        }

        Ok(())
    }

    #[instrument(skip(self, code))]
    async fn validate(&self, code: &str) -> Result<RecoveryCodeValidResponse, AppError> {
        let recovery = self.find_usable(code).await?;

        Ok(RecoveryCodeValidResponse {
            valid: true,
            expires_at: recovery.expires_at,
        })
    }
}
