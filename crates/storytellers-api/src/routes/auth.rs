//! Home page and account routes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use storytellers_aggregation::application::{command_handlers, query_handlers};
use storytellers_aggregation::domain::commands::{LogIn, RegisterUser};
use storytellers_aggregation::domain::views::HomeView;
use storytellers_core::models::{Credentials, NewUser, UserProfile};
use storytellers_core::notice::Notice;
use storytellers_workflow::application::command_handlers::handle_abandon;
use storytellers_workflow::domain::commands::Abandon;

use crate::error::{ApiError, OrRedirect, malformed};
use crate::extract::{MaybeUser, Session};
use crate::response::{GatewayResponse, RedirectTarget};
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<GatewayResponse<HomeView>, ApiError> {
    let view = query_handlers::get_home(user, &state.backends).await?;
    Ok(GatewayResponse::rendered(view))
}

/// POST /register
#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    user: Result<Json<NewUser>, JsonRejection>,
) -> Result<GatewayResponse<UserProfile>, ApiError> {
    let Json(user) = user.map_err(|e| malformed(e, RedirectTarget::Home))?;
    let command = RegisterUser {
        correlation_id: Uuid::new_v4(),
        user,
    };

    info!(correlation_id = %command.correlation_id, "handling register command");

    let reply = command_handlers::handle_register(&command, &state.backends)
        .await
        .or_redirect(RedirectTarget::Home)?;
    Ok(GatewayResponse::redirect(
        RedirectTarget::Users,
        "account created",
        reply.notices,
    ))
}

/// POST /login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<GatewayResponse<UserProfile>, ApiError> {
    let Json(credentials) = credentials.map_err(|e| malformed(e, RedirectTarget::Login))?;
    let command = LogIn {
        correlation_id: Uuid::new_v4(),
        credentials,
    };

    info!(correlation_id = %command.correlation_id, "handling log_in command");

    let reply = command_handlers::handle_log_in(&command, &state.backends)
        .await
        .or_redirect(RedirectTarget::Login)?;
    Ok(reply.into())
}

/// POST /logout
#[instrument(skip(state))]
async fn logout(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<GatewayResponse<()>, ApiError> {
    let command = Abandon {
        correlation_id: Uuid::new_v4(),
        session,
    };

    handle_abandon(&command, state.workflow_store.as_ref()).await?;
    Ok(GatewayResponse::redirect(
        RedirectTarget::Home,
        "logged out",
        vec![Notice::info("you have been logged out")],
    ))
}

/// Returns the router for the home page and account operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
