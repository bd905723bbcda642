use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use storefront_core::AppError;

/// Recovery codes stay valid for one hour.
pub const RECOVERY_CODE_TTL_MINUTES: i64 = 60;
pub const RECOVERY_CODE_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PasswordRecovery {
    pub id: i64,
    pub store_user_id: i64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordRecovery {
    pub fn ensure_usable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.used_at.is_some() {
            return Err(AppError::conflict("Recovery code already used"));
        }
        if self.expires_at <= now {
            return Err(AppError::gone("Recovery code expired"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(equal = 8))]
    #[schema(example = "K4X9Q2ZD")]
    pub code: String,
    #[validate(length(min = 8))]
    #[schema(example = "newPassword123")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecoveryCodeValidResponse {
    pub valid: bool,
    pub expires_at: DateTime<Utc>,
}
