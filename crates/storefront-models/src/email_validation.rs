use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use storefront_core::AppError;

/// Validation tokens stay valid for 24 hours.
pub const EMAIL_VALIDATION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EmailValidationToken {
    pub id: i64,
    pub store_user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl EmailValidationToken {
    /// Rejects a token that was already consumed or has expired at `now`.
    pub fn ensure_usable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.used_at.is_some() {
            return Err(AppError::conflict("Email validation token already used"));
        }
        if self.expires_at <= now {
            return Err(AppError::gone("Email validation token expired"));
        }
        Ok(())
    }
}
