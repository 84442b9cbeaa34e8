//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::TimeDelta;
use http_body_util::BodyExt;
use storytellers_test_support::{FixedClock, StubBackends};
use storytellers_workflow::application::state_store::InMemoryWorkflowStore;
use tower::ServiceExt;

use storytellers_api::extract::{SESSION_HEADER, USER_HEADER};
use storytellers_api::routes;
use storytellers_api::state::AppState;

/// Session id reused by tests that drive one session across requests.
pub const SESSION: &str = "5b0e4f0c-8d0e-4b8a-9a57-0d6f4b1c2e3a";

/// Everything a test needs to script collaborators and inspect state.
pub struct TestApp {
    /// The full gateway router.
    pub router: Router,
    /// The scripted collaborators behind it.
    pub stubs: StubBackends,
    /// The workflow store behind it.
    pub store: Arc<InMemoryWorkflowStore>,
}

/// Build the full app router over `stubs`, with a fixed clock so sessions
/// never expire mid-test. Uses the same route structure as `main.rs`.
pub fn build_test_app(stubs: StubBackends) -> TestApp {
    let clock = Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let store = Arc::new(InMemoryWorkflowStore::new(TimeDelta::hours(1), clock));
    let app_state = AppState::new(stubs.backends(), store.clone());

    TestApp {
        router: routes::app(app_state),
        stubs,
        store,
    }
}

/// A decoded gateway answer.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Null` when the body is empty.
    pub json: serde_json::Value,
}

impl TestResponse {
    /// The `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get("location")
            .and_then(|value| value.to_str().ok())
    }
}

/// Caller context sent as headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Caller<'a> {
    pub session: Option<&'a str>,
    pub user: Option<&'a str>,
}

impl<'a> Caller<'a> {
    /// Anonymous caller without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Logged-in caller on the shared test session.
    pub fn user(user: &'a str) -> Self {
        Self {
            session: Some(SESSION),
            user: Some(user),
        }
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Caller<'_>,
    body: Option<&serde_json::Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = caller.session {
        builder = builder.header(SESSION_HEADER, session);
    }
    if let Some(user) = caller.user {
        builder = builder.header(USER_HEADER, user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        json,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    caller: Caller<'_>,
    body: &serde_json::Value,
) -> TestResponse {
    send(app, "POST", uri, caller, Some(body)).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: &Router, uri: &str, caller: Caller<'_>) -> TestResponse {
    send(app, "POST", uri, caller, None).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str, caller: Caller<'_>) -> TestResponse {
    send(app, "GET", uri, caller, None).await
}
