//! # Storefront Models
//!
//! Database entities and request/response DTOs shared by the API modules.
//!
//! - [`stores`]: stores and slug generation
//! - [`store_users`]: store users and their stored credentials
//! - [`menus`]: menus, products and their upsert/list DTOs
//! - [`auth`]: registration, login and email-check payloads
//! - [`email_validation`]: email validation tokens
//! - [`password_recovery`]: recovery codes and password change payloads

pub mod auth;
pub mod email_validation;
pub mod menus;
pub mod password_recovery;
pub mod store_users;
pub mod stores;

pub use auth::{
    AuthResponse, EmailAvailabilityResponse, EmailDto, LoginDto, MessageResponse,
    RegisterStoreUserDto,
};
pub use email_validation::EmailValidationToken;
pub use menus::{
    Menu, MenuPageQuery, PaginatedMenusResponse, Product, UpsertMenuDto, UpsertProductDto,
};
pub use password_recovery::{ChangePasswordDto, PasswordRecovery, RecoveryCodeValidResponse};
pub use store_users::{StoreUser, StoreUserCredentials};
pub use stores::{Store, slugify};
