use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{change_password, request_password_recovery, validate_recovery_code};

pub fn init_password_recovery_router() -> Router<AppState> {
    Router::new()
        .route("/", post(request_password_recovery))
        .route("/change", post(change_password))
        .route("/validate/{code}", get(validate_recovery_code))
}
