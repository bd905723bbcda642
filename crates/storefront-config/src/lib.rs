//! # Storefront Config
//!
//! Configuration structures loaded from environment variables. Every value
//! has a development default except `DATABASE_URL`.
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`database`]: Postgres connection settings
//! - [`email`]: SMTP transport and sender identity
//! - [`server`]: bind address, request timeout and cookie flags
//! - [`storage`]: local asset storage
//!
//! # Example
//!
//! ```ignore
//! use storefront_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod server;
pub mod storage;

pub use cors::CorsConfig;
pub use database::{ConfigError, DatabaseConfig};
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Parses an environment variable, falling back to `default` when it is unset
/// or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(default)
}
