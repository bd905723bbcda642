//! Access token creation and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use storefront_config::JwtConfig;
use storefront_core::AppError;

use crate::claims::Claims;

/// Creates a signed access token for a store user.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    store_id: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now.saturating_add(jwt_config.access_token_expiry).max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        store_id,
        exp,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry, returning the embedded claims.
///
/// # Errors
///
/// Returns 401 "Invalid or expired token" for any invalid token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(expiry: i64) -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: expiry,
        }
    }

    #[test]
    fn test_create_and_verify_round_trip() {
        let config = config(3600);
        let token = create_access_token(7, "owner@shop.test", 42, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "owner@shop.test");
        assert_eq!(claims.store_id, 42);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = create_access_token(7, "owner@shop.test", 42, &config(3600)).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            access_token_expiry: 3600,
        };

        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.message(), "Invalid or expired token");
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // default validation allows 60s of leeway
        let token = create_access_token(7, "owner@shop.test", 42, &config(-600)).unwrap();
        assert!(verify_token(&token, &config(3600)).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify_token("not.a.jwt", &config(3600)).is_err());
    }
}
