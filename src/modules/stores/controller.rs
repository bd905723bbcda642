use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header},
};
use tracing::instrument;

use storefront_core::{AppError, ErrorResponse};
use storefront_models::stores::Store;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Media type without parameters, lowercased.
fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|mime| mime.trim().to_lowercase())
        .filter(|mime| !mime.is_empty())
}

#[utoipa::path(
    get,
    path = "/store",
    responses(
        (status = 200, description = "Store of the signed-in user", body = Store),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Store not found", body = ErrorResponse)
    ),
    tag = "Store",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn get_store(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Store>, AppError> {
    let store = state.stores.find_by_id(auth_user.store_id()).await?;
    Ok(Json(store))
}

/// Replace the store logo with the raw request body
#[utoipa::path(
    put,
    path = "/store/logo",
    request_body(content = Vec<u8>, description = "PNG, JPEG or WebP image", content_type = "image/png"),
    responses(
        (status = 200, description = "Logo updated", body = Store),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 413, description = "Logo exceeds maximum size", body = ErrorResponse),
        (status = 415, description = "Unsupported logo type", body = ErrorResponse)
    ),
    tag = "Store",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, headers, body), fields(store_id = auth_user.store_id()))]
pub async fn update_logo(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Store>, AppError> {
    let content_type =
        content_type(&headers).ok_or_else(|| AppError::unsupported_media_type("Unsupported logo type"))?;

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::payload_too_large("Logo exceeds maximum size")
        } else {
            AppError::bad_request(rejection.body_text())
        }
    })?;

    let store = state
        .stores
        .update_logo(auth_user.store_id(), &content_type, &body)
        .await?;

    Ok(Json(store))
}
