pub mod repository;

pub use repository::{PgStoreUserRepository, StoreUserRepository};
