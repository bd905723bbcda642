//! # Storefront Auth
//!
//! JWT claims and token utilities for store-user authentication.
//!
//! # Example
//!
//! ```ignore
//! use storefront_auth::{create_access_token, verify_token};
//! use storefront_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(7, "owner@shop.test", 42, &config)?;
//!
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.store_id, 42);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
