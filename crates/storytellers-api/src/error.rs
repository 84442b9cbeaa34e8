//! Storytellers API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storytellers_backend_client::error::ClientError;
use storytellers_core::error::GatewayError;
use thiserror::Error;

use crate::response::{RedirectTarget, see_other};

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A backend adapter could not be built.
    #[error("backend client error: {0}")]
    Client(#[from] ClientError),

    /// Trace export could not be set up.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Safe page to continue from.
    pub redirect: String,
}

/// HTTP-layer wrapper around `GatewayError` that implements `IntoResponse`.
///
/// Precondition and authorization failures become redirects to `target`;
/// the other classes keep their status and still name `target` in the body.
#[derive(Debug)]
pub struct ApiError {
    /// The failure.
    pub error: GatewayError,
    /// Where the caller should continue.
    pub target: RedirectTarget,
}

impl ApiError {
    /// Wraps an error with an explicit continuation.
    #[must_use]
    pub fn new(error: GatewayError, target: RedirectTarget) -> Self {
        Self { error, target }
    }

    /// Anonymous caller on a login-required route.
    #[must_use]
    pub fn login_required() -> Self {
        Self::new(
            GatewayError::Unauthorized("log in to continue".into()),
            RedirectTarget::Login,
        )
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self::new(error, RedirectTarget::Home)
    }
}

/// Extension for attaching a redirect target to a handler result.
pub trait OrRedirect<T> {
    /// Maps the error into an `ApiError` continuing at `target`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error.
    fn or_redirect(self, target: RedirectTarget) -> Result<T, ApiError>;
}

impl<T> OrRedirect<T> for Result<T, GatewayError> {
    fn or_redirect(self, target: RedirectTarget) -> Result<T, ApiError> {
        self.map_err(|error| ApiError::new(error, target))
    }
}

/// Turns an extractor rejection (unreadable body, path or query) into a
/// 400 that names the page to continue from.
pub fn malformed(rejection: impl std::fmt::Display, target: RedirectTarget) -> ApiError {
    ApiError::new(
        GatewayError::ApplicationRejected(format!("the request could not be read: {rejection}")),
        target,
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.code(),
            message: self.error.to_string(),
            redirect: self.target.path(),
        };

        let status = match &self.error {
            GatewayError::PreconditionNotMet(_) | GatewayError::Unauthorized(_) => {
                tracing::info!(code = body.error, redirect = %body.redirect, "redirecting");
                let location = body.redirect.clone();
                return see_other(&location, body);
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::ApplicationRejected(_) => StatusCode::BAD_REQUEST,
            GatewayError::ServiceUnavailable(service) => {
                tracing::warn!(%service, "answering 503");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (status, Json(body)).into_response()
    }
}
