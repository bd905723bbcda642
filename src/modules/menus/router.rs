use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    delete_menu, get_menu_by_id, get_menus, get_menus_paginated, get_product_by_id, upsert_menu,
};

pub fn init_menus_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_menus).post(upsert_menu))
        .route("/paginated", get(get_menus_paginated))
        .route("/{id}", get(get_menu_by_id).delete(delete_menu))
        .route("/{menu_id}/products/{id}", get(get_product_by_id))
}
