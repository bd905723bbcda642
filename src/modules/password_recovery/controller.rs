use axum::{Json, extract::State};
use tracing::instrument;

use storefront_core::{AppError, ErrorResponse};
use storefront_models::auth::{EmailDto, MessageResponse};
use storefront_models::password_recovery::{ChangePasswordDto, RecoveryCodeValidResponse};

use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

/// Request a password recovery code by email
#[utoipa::path(
    post,
    path = "/password-recovery",
    request_body = EmailDto,
    responses(
        (status = 200, description = "Recovery code sent if the account exists", body = MessageResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Password recovery"
)]
#[instrument(skip(state, dto))]
pub async fn request_password_recovery(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<EmailDto>,
) -> Result<Json<MessageResponse>, AppError> {
    state.password_recovery.generate(&dto.email).await?;

    Ok(Json(MessageResponse::new(
        "If an account with that email exists, a recovery code has been sent",
    )))
}

/// Set a new password using a recovery code
#[utoipa::path(
    post,
    path = "/password-recovery/change",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 404, description = "Recovery code not found", body = ErrorResponse),
        (status = 409, description = "Recovery code already used", body = ErrorResponse),
        (status = 410, description = "Recovery code expired", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Password recovery"
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .password_recovery
        .change_password(&dto.code, &dto.password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

#[utoipa::path(
    get,
    path = "/password-recovery/validate/{code}",
    params(
        ("code" = String, Path, description = "Recovery code")
    ),
    responses(
        (status = 200, description = "Recovery code is usable", body = RecoveryCodeValidResponse),
        (status = 404, description = "Recovery code not found", body = ErrorResponse),
        (status = 409, description = "Recovery code already used", body = ErrorResponse),
        (status = 410, description = "Recovery code expired", body = ErrorResponse)
    ),
    tag = "Password recovery"
)]
#[instrument(skip(state, code))]
pub async fn validate_recovery_code(
    State(state): State<AppState>,
    ValidatedPath(code): ValidatedPath<String>,
) -> Result<Json<RecoveryCodeValidResponse>, AppError> {
    let response = state.password_recovery.validate(&code).await?;
    Ok(Json(response))
}
