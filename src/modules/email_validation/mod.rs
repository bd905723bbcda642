pub mod repository;

pub use repository::{EmailValidationTokenRepository, PgEmailValidationTokenRepository};
