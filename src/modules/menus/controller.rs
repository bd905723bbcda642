use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use storefront_core::{AppError, ErrorResponse};
use storefront_models::menus::{
    Menu, MenuPageQuery, PaginatedMenusResponse, Product, UpsertMenuDto,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

/// Create a menu, or update one and replace its products when `id` is given
#[utoipa::path(
    post,
    path = "/store-user/menus",
    request_body = UpsertMenuDto,
    responses(
        (status = 201, description = "Menu saved", body = Menu),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse),
        (status = 409, description = "A menu with this label already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Menus",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(store_id = auth_user.store_id()))]
pub async fn upsert_menu(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpsertMenuDto>,
) -> Result<(StatusCode, Json<Menu>), AppError> {
    let menu = state.menus.upsert(auth_user.store_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

#[utoipa::path(
    get,
    path = "/store-user/menus",
    responses(
        (status = 200, description = "All menus of the store", body = Vec<Menu>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Menus",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn get_menus(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Menu>>, AppError> {
    let menus = state.menus.find_many(auth_user.store_id()).await?;
    Ok(Json(menus))
}

#[utoipa::path(
    get,
    path = "/store-user/menus/paginated",
    params(MenuPageQuery),
    responses(
        (status = 200, description = "One page of menus", body = PaginatedMenusResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Menus",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn get_menus_paginated(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<MenuPageQuery>,
) -> Result<Json<PaginatedMenusResponse>, AppError> {
    let page = state
        .menus
        .find_many_paginated(auth_user.store_id(), query)
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/store-user/menus/{id}",
    params(
        ("id" = i64, Path, description = "Menu ID")
    ),
    responses(
        (status = 200, description = "Menu with its products", body = Menu),
        (status = 400, description = "Invalid menu id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse)
    ),
    tag = "Menus",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn get_menu_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<Menu>, AppError> {
    let menu = state.menus.find_by_id(auth_user.store_id(), id).await?;
    Ok(Json(menu))
}

#[utoipa::path(
    get,
    path = "/store-user/menus/{menu_id}/products/{id}",
    params(
        ("menu_id" = i64, Path, description = "Menu ID"),
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product of the menu", body = Product),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Menus",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedPath((menu_id, id)): ValidatedPath<(i64, i64)>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .menus
        .find_product_by_id(auth_user.store_id(), menu_id, id)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/store-user/menus/{id}",
    params(
        ("id" = i64, Path, description = "Menu ID")
    ),
    responses(
        (status = 204, description = "Menu deleted"),
        (status = 400, description = "Invalid menu id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse)
    ),
    tag = "Menus",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn delete_menu(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<StatusCode, AppError> {
    state.menus.delete(auth_user.store_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
