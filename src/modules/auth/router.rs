use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::middleware::auth::require_auth;
use crate::modules::menus::init_menus_router;
use crate::state::AppState;

use super::controller::{
    check_email, login, logout, me, register, resend_email_validation,
    resend_email_validation_by_email, verify_email_validation,
};

pub fn init_store_user_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .nest("/menus", init_menus_router())
        .route_layer(from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        // GET authenticates through the AuthUser extractor
        .route(
            "/resend-email-validation",
            get(resend_email_validation).post(resend_email_validation_by_email),
        )
        .route("/email-validation", post(check_email))
        .route("/email-validation/{token}", get(verify_email_validation))
        .merge(protected)
}
