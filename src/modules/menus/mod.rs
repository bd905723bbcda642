//! Tenant-scoped menus and their products.

pub mod controller;
pub mod repository;
pub mod router;

pub use repository::{MenuRepository, PgMenuRepository};
pub use router::init_menus_router;
