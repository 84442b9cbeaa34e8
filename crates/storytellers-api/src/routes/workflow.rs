//! Authoring flow routes: roll prompts, compose, submit and resume.
//!
//! Mounted under `/stories`, next to the reading routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use storytellers_aggregation::application::query_handlers::{get_drafts, list_stories};
use storytellers_aggregation::domain::views::StoryListView;
use storytellers_core::error::GatewayError;
use storytellers_core::identity::StoryId;
use storytellers_core::models::StoryListing;
use storytellers_workflow::application::command_handlers::{
    self, ComposeView, SubmissionKind,
};
use storytellers_workflow::application::query_handlers::{SettingsView, get_settings};
use storytellers_workflow::domain::commands::{OpenCompose, ResumeDraft, RollPrompts, SubmitStory};
use storytellers_workflow::domain::state::WorkflowState;

use crate::error::{ApiError, OrRedirect, malformed};
use crate::extract::{CurrentUser, MaybeUser, Session};
use crate::response::{GatewayResponse, RedirectTarget};
use crate::state::AppState;

/// Request body for rolling prompts.
#[derive(Debug, Deserialize)]
pub struct RollRequest {
    /// How many prompts to roll.
    pub dice_number: u32,
    /// The `<id>_<name>` selector of the prompt set.
    pub dice_set: String,
}

/// Request body for submitting the composed story.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// The story text.
    pub text: String,
    /// Save without publishing.
    #[serde(default)]
    pub as_draft: bool,
}

/// GET /stories/new/settings
#[instrument(skip(state))]
async fn settings(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<GatewayResponse<SettingsView>, ApiError> {
    let view = get_settings(session, &state.backends, state.workflow_store.as_ref())
        .await
        .or_redirect(RedirectTarget::Home)?;
    Ok(GatewayResponse::rendered(view))
}

/// POST /stories/new/roll
#[instrument(skip(state, request))]
async fn roll(
    State(state): State<AppState>,
    Session(session): Session,
    MaybeUser(roller): MaybeUser,
    request: Result<Json<RollRequest>, JsonRejection>,
) -> Result<GatewayResponse<WorkflowState>, ApiError> {
    let Json(request) = request.map_err(|e| malformed(e, RedirectTarget::RollStep))?;
    let command = RollPrompts {
        correlation_id: Uuid::new_v4(),
        session,
        roller,
        prompt_count: request.dice_number,
        selector: request.dice_set,
    };

    info!(correlation_id = %command.correlation_id, "handling roll_prompts command");

    let reply = command_handlers::handle_roll_prompts(
        &command,
        &state.backends,
        state.workflow_store.as_ref(),
    )
    .await
    .or_redirect(RedirectTarget::RollStep)?;
    Ok(reply.into())
}

/// GET /stories/new/write
#[instrument(skip(state))]
async fn compose(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<GatewayResponse<ComposeView>, ApiError> {
    let command = OpenCompose {
        correlation_id: Uuid::new_v4(),
        session,
    };

    let reply = command_handlers::handle_open_compose(&command, state.workflow_store.as_ref())
        .await
        .or_redirect(RedirectTarget::RollStep)?;
    Ok(reply.into())
}

/// POST /stories/new/write
///
/// Lands on the public list after publishing and on the author's drafts
/// after saving a draft.
#[instrument(skip(state, request))]
async fn submit(
    State(state): State<AppState>,
    Session(session): Session,
    CurrentUser(author): CurrentUser,
    request: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<GatewayResponse<StoryListView>, ApiError> {
    let Json(request) = request.map_err(|e| malformed(e, RedirectTarget::Compose))?;
    let command = SubmitStory {
        correlation_id: Uuid::new_v4(),
        session,
        author,
        text: request.text,
        as_draft: request.as_draft,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_story command");

    let reply = command_handlers::handle_submit_story(
        &command,
        &state.backends,
        state.workflow_store.as_ref(),
    )
    .await
    .map_err(|error| {
        let target = match error {
            GatewayError::PreconditionNotMet(_) => RedirectTarget::RollStep,
            GatewayError::Unauthorized(_) => RedirectTarget::Home,
            _ => RedirectTarget::Compose,
        };
        ApiError::new(error, target)
    })?;

    let (landing, target) = match reply.value.kind {
        SubmissionKind::Published => (
            list_stories(&StoryListing::All, &state.backends).await,
            RedirectTarget::Stories,
        ),
        SubmissionKind::SavedDraft => (
            get_drafts(author, &state.backends).await,
            RedirectTarget::Drafts,
        ),
    };

    // The story is stored; a failing list only changes where the caller lands.
    Ok(match landing {
        Ok(view) => GatewayResponse::Rendered {
            view,
            notices: reply.notices,
        },
        Err(error) => GatewayResponse::redirect(target, error.to_string(), reply.notices),
    })
}

/// GET /stories/new/write/{id}
#[instrument(skip(state))]
async fn resume(
    State(state): State<AppState>,
    Session(session): Session,
    CurrentUser(requester): CurrentUser,
    story_id: Result<Path<StoryId>, PathRejection>,
) -> Result<GatewayResponse<ComposeView>, ApiError> {
    let Path(story_id) = story_id.map_err(|e| malformed(e, RedirectTarget::Drafts))?;
    let command = ResumeDraft {
        correlation_id: Uuid::new_v4(),
        session,
        requester,
        story_id,
    };

    info!(correlation_id = %command.correlation_id, "handling resume_draft command");

    let reply = command_handlers::handle_resume_draft(
        &command,
        &state.backends,
        state.workflow_store.as_ref(),
    )
    .await
    .map_err(|error| {
        let target = match error {
            GatewayError::PreconditionNotMet(_) => RedirectTarget::Drafts,
            _ => RedirectTarget::Home,
        };
        ApiError::new(error, target)
    })?;
    Ok(reply.into())
}

/// Returns the router for the authoring flow.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new/settings", get(settings))
        .route("/new/roll", post(roll))
        .route("/new/write", get(compose).post(submit))
        .route("/new/write/{id}", get(resume))
}
