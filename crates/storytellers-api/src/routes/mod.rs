//! Route modules, one per area of the site.

pub mod auth;
pub mod health;
pub mod search;
pub mod stories;
pub mod users;
pub mod workflow;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::extract::session_layer;
use crate::state::AppState;

/// Assembles the full gateway router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(search::router())
        .nest("/users", users::router())
        .nest("/stories", stories::router().merge(workflow::router()))
        .layer(middleware::from_fn(session_layer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
