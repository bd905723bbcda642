//! Registration, login and email-check payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store_users::StoreUser;

/// Registers a new store together with its first user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterStoreUserDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Corner Bakery")]
    pub store_name: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Ada Baker")]
    pub name: String,
    #[validate(email)]
    #[schema(example = "owner@corner.bakery")]
    pub email: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmailDto {
    #[validate(email)]
    #[schema(example = "owner@corner.bakery")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: StoreUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailAvailabilityResponse {
    pub email: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
