//! User listing, walls and follow routes.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;
use tracing::{info, instrument};
use uuid::Uuid;

use storytellers_aggregation::application::{command_handlers, query_handlers};
use storytellers_aggregation::domain::commands::{FollowUser, UnfollowUser};
use storytellers_aggregation::domain::views::{
    FollowersView, StoryListView, UserListView, WallView,
};
use storytellers_core::identity::UserId;

use crate::error::{ApiError, OrRedirect, malformed};
use crate::extract::CurrentUser;
use crate::response::{GatewayResponse, RedirectTarget};
use crate::state::AppState;

/// GET /users
#[instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
) -> Result<GatewayResponse<UserListView>, ApiError> {
    let view = query_handlers::list_users(&state.backends).await?;
    Ok(GatewayResponse::rendered(view))
}

/// GET /users/{id}
#[instrument(skip(state))]
async fn wall(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<GatewayResponse<WallView>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| malformed(e, RedirectTarget::Users))?;
    let view = query_handlers::get_wall(user_id, &state.backends)
        .await
        .or_redirect(RedirectTarget::Users)?;
    Ok(GatewayResponse::rendered(view))
}

/// POST /users/{id}/follow
#[instrument(skip(state))]
async fn follow(
    State(state): State<AppState>,
    CurrentUser(follower): CurrentUser,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<GatewayResponse<WallView>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| malformed(e, RedirectTarget::Users))?;
    let command = FollowUser {
        correlation_id: Uuid::new_v4(),
        follower,
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling follow_user command");

    let reply = command_handlers::handle_follow(&command, &state.backends)
        .await
        .or_redirect(RedirectTarget::Wall(user_id))?;
    Ok(reply.into())
}

/// POST /users/{id}/unfollow
#[instrument(skip(state))]
async fn unfollow(
    State(state): State<AppState>,
    CurrentUser(follower): CurrentUser,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<GatewayResponse<WallView>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| malformed(e, RedirectTarget::Users))?;
    let command = UnfollowUser {
        correlation_id: Uuid::new_v4(),
        follower,
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling unfollow_user command");

    let reply = command_handlers::handle_unfollow(&command, &state.backends)
        .await
        .or_redirect(RedirectTarget::Wall(user_id))?;
    Ok(reply.into())
}

/// GET /users/{id}/followers
#[instrument(skip(state))]
async fn followers(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<GatewayResponse<FollowersView>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| malformed(e, RedirectTarget::Users))?;
    let view = query_handlers::get_followers(user_id, &state.backends)
        .await
        .or_redirect(RedirectTarget::Wall(user_id))?;
    Ok(GatewayResponse::rendered(view))
}

/// GET /users/{id}/stories
#[instrument(skip(state))]
async fn stories(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| malformed(e, RedirectTarget::Users))?;
    let view = query_handlers::get_user_stories(user_id, &state.backends)
        .await
        .or_redirect(RedirectTarget::Wall(user_id))?;
    Ok(GatewayResponse::rendered(view))
}

/// Returns the router for user operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(wall))
        .route("/{id}/follow", post(follow))
        .route("/{id}/unfollow", post(unfollow))
        .route("/{id}/followers", get(followers))
        .route("/{id}/stories", get(stories))
}
