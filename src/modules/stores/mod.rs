pub mod controller;
pub mod repository;
pub mod router;

pub use repository::{PgStoreRepository, StoreRepository};
pub use router::init_store_router;
