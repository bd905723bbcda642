//! Request middleware and extractors.
//!
//! - [`auth`]: JWT authentication from the `Authorization` header or the
//!   `access_token` cookie
//! - [`timeout`]: per-request deadline answered with a 408 `{ "message" }` body
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, require_auth};
//!
//! let menus = init_menus_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//!
//! async fn handler(auth_user: AuthUser) -> impl IntoResponse {
//!     let store_id = auth_user.store_id();
//!     // ...
//! }
//! ```

pub mod auth;
pub mod timeout;
