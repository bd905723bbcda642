pub mod controller;
pub mod router;
pub mod service;

pub use router::init_store_user_router;
pub use service::{AuthStoreUserRepository, AuthStoreUserService};
