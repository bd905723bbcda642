use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StoreUser {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreUser {
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

/// Row used for sign-in; carries the password hash and never leaves the
/// auth service.
#[derive(Debug, Clone, FromRow)]
pub struct StoreUserCredentials {
    #[sqlx(flatten)]
    pub user: StoreUser,
    pub password: String,
}
