use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;

use storefront_core::{AppError, ErrorResponse};
use storefront_models::auth::{
    AuthResponse, EmailAvailabilityResponse, EmailDto, LoginDto, MessageResponse,
    RegisterStoreUserDto,
};
use storefront_models::store_users::StoreUser;

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, AuthUser};
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

fn access_token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .build()
}

/// Register a store and its first user
#[utoipa::path(
    post,
    path = "/store-user/register",
    request_body = RegisterStoreUserDto,
    responses(
        (status = 201, description = "Store user registered", body = AuthResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Store user"
)]
#[instrument(skip(state, jar, dto))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<RegisterStoreUserDto>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let response = state.auth.sign_up_with_email_and_password(dto).await?;
    let jar = jar.add(access_token_cookie(
        response.access_token.clone(),
        state.server_config.cookie_secure,
    ));

    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/store-user/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Signed in; the access token is also set as a cookie", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Store user"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let response = state.auth.sign_in_with_email_and_password(dto).await?;
    let jar = jar.add(access_token_cookie(
        response.access_token.clone(),
        state.server_config.cookie_secure,
    ));

    Ok((StatusCode::OK, jar, Json(response)))
}

#[utoipa::path(
    get,
    path = "/store-user/me",
    responses(
        (status = 200, description = "Current store user", body = StoreUser),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Store user not found", body = ErrorResponse)
    ),
    tag = "Store user",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StoreUser>, AppError> {
    let user = state
        .auth
        .me(auth_user.store_id(), auth_user.user_id()?)
        .await?;

    Ok(Json(user))
}

/// Resend the validation email to the signed-in user
#[utoipa::path(
    get,
    path = "/store-user/resend-email-validation",
    responses(
        (status = 200, description = "Validation email sent", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Email already validated", body = ErrorResponse)
    ),
    tag = "Store user",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(store_id = auth_user.store_id()))]
pub async fn resend_email_validation(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .resend_email_validation(auth_user.store_id(), auth_user.user_id()?)
        .await?;

    Ok(Json(MessageResponse::new("Validation email sent")))
}

/// Resend the validation email to an address
#[utoipa::path(
    post,
    path = "/store-user/resend-email-validation",
    request_body = EmailDto,
    responses(
        (status = 200, description = "Validation email sent if the account needs one", body = MessageResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Store user"
)]
#[instrument(skip(state, dto))]
pub async fn resend_email_validation_by_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<EmailDto>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .resend_email_validation_by_email(&dto.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "If the account exists and is not validated, a validation email has been sent",
    )))
}

/// Check whether an email is still available
#[utoipa::path(
    post,
    path = "/store-user/email-validation",
    request_body = EmailDto,
    responses(
        (status = 200, description = "Email availability", body = EmailAvailabilityResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Store user"
)]
#[instrument(skip(state, dto))]
pub async fn check_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<EmailDto>,
) -> Result<Json<EmailAvailabilityResponse>, AppError> {
    let available = state.auth.is_valid_email(&dto.email).await?;

    Ok(Json(EmailAvailabilityResponse {
        email: dto.email,
        available,
    }))
}

#[utoipa::path(
    get,
    path = "/store-user/logout",
    responses(
        (status = 200, description = "Access token cookie cleared", body = MessageResponse)
    ),
    tag = "Store user"
)]
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let mut cookie = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .http_only(true)
        .path("/")
        .build();
    // sent even when the request carried no cookie
    cookie.make_removal();

    (jar.add(cookie), Json(MessageResponse::new("Logged out")))
}

/// Confirm an email address from the link sent by email
#[utoipa::path(
    get,
    path = "/store-user/email-validation/{token}",
    params(
        ("token" = String, Path, description = "Email validation token")
    ),
    responses(
        (status = 200, description = "Email validated", body = MessageResponse),
        (status = 404, description = "Email validation token not found", body = ErrorResponse),
        (status = 409, description = "Email validation token already used", body = ErrorResponse),
        (status = 410, description = "Email validation token expired", body = ErrorResponse)
    ),
    tag = "Store user"
)]
#[instrument(skip(state, token))]
pub async fn verify_email_validation(
    State(state): State<AppState>,
    ValidatedPath(token): ValidatedPath<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .verify_email_validation_integrity_by_token(&token)
        .await?;

    Ok(Json(MessageResponse::new("Email validated")))
}
