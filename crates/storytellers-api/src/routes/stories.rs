//! Story listing, reading and reaction routes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use storytellers_aggregation::application::{command_handlers, query_handlers};
use storytellers_aggregation::domain::commands::ReactToStory;
use storytellers_aggregation::domain::views::{StoryListView, StorySummary, StoryView};
use storytellers_core::identity::StoryId;
use storytellers_core::models::{ReactionKind, ReactionStats, StoryListing};

use crate::error::{ApiError, OrRedirect, malformed};
use crate::extract::{CurrentUser, MaybeUser};
use crate::response::{GatewayResponse, RedirectTarget};
use crate::state::AppState;

/// Query string for GET /stories/range.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    /// First day, inclusive.
    pub begin: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

/// Request body for reacting to a story.
#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    /// Like or dislike.
    pub reaction: ReactionKind,
}

async fn listing(
    state: &AppState,
    listing: &StoryListing,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    let view = query_handlers::list_stories(listing, &state.backends)
        .await
        .or_redirect(RedirectTarget::Stories)?;
    Ok(GatewayResponse::rendered(view))
}

/// GET /stories
#[instrument(skip(state))]
async fn list_all(
    State(state): State<AppState>,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    listing(&state, &StoryListing::All).await
}

/// GET /stories/latest
#[instrument(skip(state))]
async fn list_latest(
    State(state): State<AppState>,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    listing(&state, &StoryListing::Latest).await
}

/// GET /stories/range?begin=..&end=..
#[instrument(skip(state))]
async fn list_range(
    State(state): State<AppState>,
    range: Result<Query<RangeParams>, QueryRejection>,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    let Query(range) = range.map_err(|e| malformed(e, RedirectTarget::Stories))?;
    let range = StoryListing::Range {
        begin: range.begin,
        end: range.end,
    };
    listing(&state, &range).await
}

/// GET /stories/random
#[instrument(skip(state))]
async fn random(
    State(state): State<AppState>,
) -> Result<GatewayResponse<StorySummary>, ApiError> {
    let story = query_handlers::get_random_story(&state.backends)
        .await
        .or_redirect(RedirectTarget::Stories)?;
    Ok(GatewayResponse::rendered(story))
}

/// GET /stories/drafts
#[instrument(skip(state))]
async fn drafts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    let view = query_handlers::get_drafts(user, &state.backends).await?;
    Ok(GatewayResponse::rendered(view))
}

/// GET /stories/{id}
#[instrument(skip(state))]
async fn story(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    story_id: Result<Path<StoryId>, PathRejection>,
) -> Result<GatewayResponse<StoryView>, ApiError> {
    let Path(story_id) = story_id.map_err(|e| malformed(e, RedirectTarget::Stories))?;
    let view = query_handlers::get_story_view(story_id, viewer, &state.backends)
        .await
        .or_redirect(RedirectTarget::Home)?;
    Ok(GatewayResponse::rendered(view))
}

/// POST /stories/{id}/react
#[instrument(skip(state, request))]
async fn react(
    State(state): State<AppState>,
    CurrentUser(reader): CurrentUser,
    story_id: Result<Path<StoryId>, PathRejection>,
    request: Result<Json<ReactRequest>, JsonRejection>,
) -> Result<GatewayResponse<Option<ReactionStats>>, ApiError> {
    let Path(story_id) = story_id.map_err(|e| malformed(e, RedirectTarget::Stories))?;
    let Json(request) = request.map_err(|e| malformed(e, RedirectTarget::Story(story_id)))?;
    let command = ReactToStory {
        correlation_id: Uuid::new_v4(),
        reader,
        story_id,
        kind: request.reaction,
    };

    info!(correlation_id = %command.correlation_id, "handling react_to_story command");

    let reply = command_handlers::handle_react(&command, &state.backends)
        .await
        .or_redirect(RedirectTarget::Story(story_id))?;
    Ok(reply.into())
}

/// Returns the router for story reading operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/latest", get(list_latest))
        .route("/range", get(list_range))
        .route("/random", get(random))
        .route("/drafts", get(drafts))
        .route("/{id}", get(story))
        .route("/{id}/react", post(react))
}
