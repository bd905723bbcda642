pub mod auth;
pub mod email_validation;
pub mod menus;
pub mod password_recovery;
pub mod store_users;
pub mod stores;
