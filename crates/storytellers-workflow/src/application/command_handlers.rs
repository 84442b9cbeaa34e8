//! Command handlers for the authoring workflow.
//!
//! Each handler loads the session's state, validates the transition before
//! any backend call, performs at most one write to a collaborator, and only
//! then stores the next state. A failed step leaves the stored state exactly
//! as it was.

use serde::Serialize;
use storytellers_core::backend::Backends;
use storytellers_core::command::Command;
use storytellers_core::error::GatewayError;
use storytellers_core::identity::StoryId;
use storytellers_core::models::{NewStory, StoryRecord, StoryUpdate};
use storytellers_core::notice::{Notice, Reply};
use storytellers_core::trace;
use tracing::{info, instrument};

use crate::application::state_store::WorkflowStateStore;
use crate::domain::commands::{
    Abandon, OpenCompose, PromptSetSelector, ResumeDraft, RollPrompts, SubmitStory,
};
use crate::domain::state::WorkflowState;

/// What the editor is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeView {
    /// Prompts to write from.
    pub prompts: Vec<String>,
    /// Draft being edited, if any.
    pub resuming_draft_id: Option<StoryId>,
    /// Text to pre-fill; only known right after resuming a draft.
    pub draft_text: Option<String>,
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    /// The story is public.
    Published,
    /// The story was kept as a draft.
    SavedDraft,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Published or saved as draft.
    pub kind: SubmissionKind,
    /// The stored record, when the Narrative service returned one.
    pub story: Option<StoryRecord>,
}

/// Handles the `RollPrompts` command.
///
/// The count and selector are validated before the PromptSet service is
/// called. A successful roll replaces the session's whole state, so a roll
/// while composing restarts the flow.
///
/// # Errors
///
/// Returns `GatewayError::PreconditionNotMet` for a zero count or a
/// malformed selector, and the PromptSet service's error otherwise; in every
/// error case the stored state is unchanged.
#[instrument(skip(backends, store), fields(command_type = command.command_type()))]
pub async fn handle_roll_prompts(
    command: &RollPrompts,
    backends: &Backends,
    store: &dyn WorkflowStateStore,
) -> Result<Reply<WorkflowState>, GatewayError> {
    if command.prompt_count == 0 {
        return Err(GatewayError::PreconditionNotMet(
            "roll at least one prompt".into(),
        ));
    }
    let selector: PromptSetSelector = command.selector.parse()?;

    let prompts = backends
        .prompts
        .roll(&selector.id, command.prompt_count)
        .await
        .into_collection()?;
    if prompts.is_empty() {
        return Err(GatewayError::ApplicationRejected(format!(
            "prompt set {} rolled no prompts",
            selector.name
        )));
    }
    trace::validate(&prompts).map_err(|e| {
        GatewayError::ApplicationRejected(format!("prompt set {} rolled {e}", selector.name))
    })?;

    let state = WorkflowState::rolled(selector, command.prompt_count, prompts)
        .owned_by(command.roller.map(|roller| roller.user_id));
    store.save(command.session, state.clone()).await?;
    info!(
        correlation_id = %command.correlation_id,
        session = %command.session,
        "prompts rolled"
    );
    Ok(Reply::new(state))
}

/// Handles the `OpenCompose` command.
///
/// # Errors
///
/// Returns `GatewayError::PreconditionNotMet` if the session has no rolled
/// prompts, including when its state expired.
#[instrument(skip(store), fields(command_type = command.command_type()))]
pub async fn handle_open_compose(
    command: &OpenCompose,
    store: &dyn WorkflowStateStore,
) -> Result<Reply<ComposeView>, GatewayError> {
    let current = store.load(command.session).await?.unwrap_or_default();
    let next = current.open_compose()?;
    let view = ComposeView {
        prompts: next.prompts().map(<[String]>::to_vec).unwrap_or_default(),
        resuming_draft_id: next.resuming_draft_id,
        draft_text: None,
    };
    if next != current {
        store.save(command.session, next).await?;
    }
    Ok(Reply::new(view))
}

/// Handles the `SubmitStory` command.
///
/// Creates the story, or updates the resumed draft in place. On success the
/// session's state is cleared in one store call.
///
/// # Errors
///
/// Returns `GatewayError::PreconditionNotMet` unless the session is
/// composing, `GatewayError::Unauthorized` if another user started the
/// flow, and the Narrative service's error otherwise; in every error case
/// the stored state is unchanged.
#[instrument(skip(backends, store), fields(command_type = command.command_type()))]
pub async fn handle_submit_story(
    command: &SubmitStory,
    backends: &Backends,
    store: &dyn WorkflowStateStore,
) -> Result<Reply<Submission>, GatewayError> {
    let current = store.load(command.session).await?.unwrap_or_default();
    let staged = current.stage(command.author)?;

    let outcome = match staged.resuming_draft_id {
        Some(draft_id) => {
            let update = StoryUpdate {
                author_id: command.author.user_id,
                text: command.text.clone(),
                is_draft: command.as_draft,
                figures: staged.figures,
            };
            backends.narrative.update_story(draft_id, &update).await
        }
        None => {
            let story = NewStory {
                author_id: command.author.user_id,
                text: command.text.clone(),
                is_draft: command.as_draft,
                figures: staged.figures,
                dice_set: staged.prompt_set_id,
            };
            backends.narrative.create_story(&story).await
        }
    };
    let story = outcome.into_result()?;

    store.clear(command.session).await?;

    let (kind, notice) = if command.as_draft {
        (SubmissionKind::SavedDraft, "draft saved")
    } else {
        (SubmissionKind::Published, "story published")
    };
    info!(
        correlation_id = %command.correlation_id,
        session = %command.session,
        ?kind,
        "story submitted"
    );
    Ok(Reply::new(Submission { kind, story }).with_notice(Notice::info(notice)))
}

/// Handles the `ResumeDraft` command.
///
/// # Errors
///
/// Returns `GatewayError::Unauthorized` if the requester did not write the
/// story, `GatewayError::PreconditionNotMet` if it is already published or
/// has no prompts, and the Narrative service's error otherwise. The stored
/// state is only touched on success.
#[instrument(skip(backends, store), fields(command_type = command.command_type()))]
pub async fn handle_resume_draft(
    command: &ResumeDraft,
    backends: &Backends,
    store: &dyn WorkflowStateStore,
) -> Result<Reply<ComposeView>, GatewayError> {
    let draft = backends
        .narrative
        .get_story(command.story_id)
        .await
        .into_present(GatewayError::NotFound(format!(
            "story {} does not exist",
            command.story_id
        )))?;

    if !command.requester.is(draft.author_id) {
        return Err(GatewayError::Unauthorized(format!(
            "story {} belongs to another author",
            command.story_id
        )));
    }
    if !draft.is_draft {
        return Err(GatewayError::PreconditionNotMet(format!(
            "story {} is already published",
            command.story_id
        )));
    }

    let state = WorkflowState::resumed(&draft)?;
    let view = ComposeView {
        prompts: state.prompts().map(<[String]>::to_vec).unwrap_or_default(),
        resuming_draft_id: Some(draft.id),
        draft_text: Some(draft.text),
    };
    store.save(command.session, state).await?;
    info!(
        correlation_id = %command.correlation_id,
        session = %command.session,
        story_id = command.story_id,
        "draft resumed"
    );
    Ok(Reply::new(view))
}

/// Handles the `Abandon` command.
///
/// # Errors
///
/// Returns the store's error.
#[instrument(skip(store), fields(command_type = command.command_type()))]
pub async fn handle_abandon(
    command: &Abandon,
    store: &dyn WorkflowStateStore,
) -> Result<(), GatewayError> {
    store.clear(command.session).await?;
    info!(
        correlation_id = %command.correlation_id,
        session = %command.session,
        "workflow abandoned"
    );
    Ok(())
}
