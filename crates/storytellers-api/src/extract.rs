//! Request-scoped caller context: session and identity.
//!
//! The upstream authentication layer forwards the logged-in user in the
//! `x-user-id` header. The session is carried in `x-session-id`; requests
//! without one are assigned a fresh id, which is echoed back on the response.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use storytellers_core::identity::{Identity, SessionId, UserId};

use crate::error::ApiError;

/// Header carrying the session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Header carrying the authenticated user id.
pub const USER_HEADER: &str = "x-user-id";

fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get(SESSION_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let user_id: UserId = headers.get(USER_HEADER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Identity::new(user_id))
}

/// Middleware resolving the session id and echoing it on the response.
pub async fn session_layer(mut request: Request, next: Next) -> Response {
    let session = session_from_headers(request.headers()).unwrap_or_default();
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&session.to_string()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// The caller's session.
#[derive(Debug, Clone, Copy)]
pub struct Session(pub SessionId);

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionId>()
            .copied()
            .or_else(|| session_from_headers(&parts.headers))
            .unwrap_or_default();
        Ok(Self(session))
    }
}

/// The caller, if logged in.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(identity_from_headers(&parts.headers)))
    }
}

/// The logged-in caller; anonymous callers are redirected to the login page.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers)
            .map(Self)
            .ok_or_else(ApiError::login_required)
    }
}
