use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, put},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{get_store, update_logo};

pub fn init_store_router(state: AppState) -> Router<AppState> {
    let max_logo_bytes = state.storage_config.max_bytes;

    Router::new()
        .route("/", get(get_store))
        .route(
            "/logo",
            put(update_logo).layer(DefaultBodyLimit::max(max_logo_bytes)),
        )
        .route_layer(from_fn_with_state(state, require_auth))
}
