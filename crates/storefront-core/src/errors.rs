//! Application error type and the HTTP error policy.
//!
//! Every handler returns `Result<_, AppError>`. The [`IntoResponse`] impl
//! below is the only place where failures are turned into responses:
//!
//! - a client-class status (4xx) is a *domain error*: the client receives
//!   that status and `{ "message": ... }`;
//! - anything else is an *unexpected fault*: the full error chain is logged
//!   and the client receives a bare 500 with an empty body.
//!
//! Each failed request produces exactly one event on [`ERROR_LOG_TARGET`].

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Tracing target used for the per-request error event.
pub const ERROR_LOG_TARGET: &str = "storefront::errors";

/// Body of every error response that carries detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    fn domain(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, Error::msg(message.into()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::UNAUTHORIZED, message)
    }


    pub fn not_found(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::CONFLICT, message)
    }

    pub fn request_timeout(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::REQUEST_TIMEOUT, message)
    }

    pub fn gone(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::GONE, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::UNSUPPORTED_MEDIA_TYPE, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::domain(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Whether the error is an expected failure whose message may reach the client.
    pub fn is_domain(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_domain() {
            tracing::warn!(
                target: ERROR_LOG_TARGET,
                status = %self.status.as_u16(),
                message = %self.error,
                "Request rejected"
            );

            let body = Json(ErrorResponse {
                message: self.error.to_string(),
            });
            return (self.status, body).into_response();
        }

        tracing::error!(
            target: ERROR_LOG_TARGET,
            status = %self.status.as_u16(),
            error = ?self.error,
            "Unhandled error"
        );

        self.status.into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
