//! # Storefront Core
//!
//! Shared building blocks for the Storefront API:
//!
//! - [`errors`]: the application error type and its HTTP error policy
//! - [`pagination`]: page-based pagination parameters and metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`file_storage`]: storage backend for uploaded store assets
//! - [`serde`]: lenient deserializers for query-string values
//!
//! # Example
//!
//! ```ignore
//! use storefront_core::errors::AppError;
//! use storefront_core::pagination::PaginationParams;
//!
//! let error = AppError::not_found("Menu not found");
//! let params = PaginationParams::default();
//! let offset = params.offset();
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::{AppError, ERROR_LOG_TARGET, ErrorResponse};
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
