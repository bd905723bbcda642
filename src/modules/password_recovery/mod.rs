pub mod controller;
pub mod repository;
pub mod router;
pub mod service;

pub use repository::{PgRecoveryCodeRepository, RecoveryCodeRepository};
pub use router::init_password_recovery_router;
pub use service::{PasswordRecoveryRepository, PasswordRecoveryService};
