//! Session workflow state and its transitions.
//!
//! Every transition builds a new `WorkflowState` from the current one; the
//! caller stores it as a unit, so a failed step never leaves a half-written
//! state behind.

use serde::{Deserialize, Serialize};
use storytellers_core::error::GatewayError;
use storytellers_core::identity::{Identity, StoryId, UserId};
use storytellers_core::models::StoryRecord;
use storytellers_core::trace;

use super::commands::PromptSetSelector;

/// Where a session stands in the authoring flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// Nothing rolled yet.
    #[default]
    Idle,
    /// Prompts rolled, editor not opened.
    RolledPrompts,
    /// Editor open, for a new story or a resumed draft.
    Composing,
}

/// The authoring state of one session.
///
/// `rolled_prompts` is non-empty exactly when the phase is `RolledPrompts`
/// or `Composing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Active prompt set id.
    #[serde(rename = "id_set")]
    pub prompt_set_id: Option<String>,
    /// Active prompt set name.
    #[serde(rename = "name_set")]
    pub prompt_set_name: Option<String>,
    /// Prompts requested by the last roll.
    #[serde(rename = "dice_number")]
    pub prompt_count: Option<u32>,
    /// Outcome of the last roll, or the prompts of a resumed draft.
    #[serde(rename = "figures")]
    pub rolled_prompts: Option<Vec<String>>,
    /// Draft being edited in place.
    pub resuming_draft_id: Option<StoryId>,
    /// User who started this flow; only they may submit it.
    #[serde(default)]
    pub owner: Option<UserId>,
    /// Current phase.
    pub phase: WorkflowPhase,
}

/// A story ready to hand to the Narrative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedStory {
    /// Encoded prompt trace.
    pub figures: String,
    /// Prompt set the story was rolled from, when known.
    pub prompt_set_id: Option<String>,
    /// Draft to update instead of creating a new story.
    pub resuming_draft_id: Option<StoryId>,
}

impl WorkflowState {
    /// The state after a successful roll. Replaces everything, including a
    /// resumed draft.
    #[must_use]
    pub fn rolled(selector: PromptSetSelector, prompt_count: u32, prompts: Vec<String>) -> Self {
        Self {
            prompt_set_id: Some(selector.id),
            prompt_set_name: Some(selector.name),
            prompt_count: Some(prompt_count),
            rolled_prompts: Some(prompts),
            resuming_draft_id: None,
            owner: None,
            phase: WorkflowPhase::RolledPrompts,
        }
    }

    /// Binds the flow to the user who started it.
    #[must_use]
    pub fn owned_by(self, owner: Option<UserId>) -> Self {
        Self { owner, ..self }
    }

    /// The state after re-opening a draft for editing.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::PreconditionNotMet` if the draft carries no
    /// usable prompts.
    pub fn resumed(draft: &StoryRecord) -> Result<Self, GatewayError> {
        let prompts = draft.prompts();
        if prompts.is_empty() {
            return Err(GatewayError::PreconditionNotMet(format!(
                "draft {} has no prompts to write from",
                draft.id
            )));
        }
        trace::validate(&prompts).map_err(|e| {
            GatewayError::PreconditionNotMet(format!("draft {} cannot be edited: {e}", draft.id))
        })?;

        Ok(Self {
            prompt_set_id: draft.dice_set.clone(),
            prompt_set_name: None,
            prompt_count: u32::try_from(prompts.len()).ok(),
            rolled_prompts: Some(prompts),
            resuming_draft_id: Some(draft.id),
            owner: Some(draft.author_id),
            phase: WorkflowPhase::Composing,
        })
    }

    /// The rolled prompts, if the session holds any.
    #[must_use]
    pub fn prompts(&self) -> Option<&[String]> {
        match (self.phase, self.rolled_prompts.as_deref()) {
            (WorkflowPhase::Idle, _) | (_, None | Some([])) => None,
            (_, Some(prompts)) => Some(prompts),
        }
    }

    /// The selector of the active prompt set, if both halves are known.
    #[must_use]
    pub fn selector(&self) -> Option<String> {
        match (&self.prompt_set_id, &self.prompt_set_name) {
            (Some(id), Some(name)) => Some(format!("{id}_{name}")),
            _ => None,
        }
    }

    /// The state after opening the editor.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::PreconditionNotMet` if nothing has been
    /// rolled.
    pub fn open_compose(&self) -> Result<Self, GatewayError> {
        if self.prompts().is_none() {
            return Err(GatewayError::PreconditionNotMet(
                "roll some prompts before writing a story".into(),
            ));
        }
        Ok(Self {
            phase: WorkflowPhase::Composing,
            ..self.clone()
        })
    }

    /// Encodes the prompts for submission by `author`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::PreconditionNotMet` unless the editor is open
    /// with prompts that can be encoded, and `GatewayError::Unauthorized` if
    /// the flow belongs to another user.
    pub fn stage(&self, author: Identity) -> Result<StagedStory, GatewayError> {
        let prompts = match (self.phase, self.prompts()) {
            (WorkflowPhase::Composing, Some(prompts)) => prompts,
            _ => {
                return Err(GatewayError::PreconditionNotMet(
                    "there is no story being written in this session".into(),
                ));
            }
        };
        if let Some(owner) = self.owner
            && !author.is(owner)
        {
            return Err(GatewayError::Unauthorized(match self.resuming_draft_id {
                Some(draft_id) => format!("draft {draft_id} belongs to another author"),
                None => "this story was started by another user".into(),
            }));
        }
        let figures = trace::encode(prompts)
            .map_err(|e| GatewayError::PreconditionNotMet(e.to_string()))?;

        Ok(StagedStory {
            figures,
            prompt_set_id: self.prompt_set_id.clone(),
            resuming_draft_id: self.resuming_draft_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use storytellers_test_support::draft;

    use super::*;

    fn goblins() -> PromptSetSelector {
        "7_goblins".parse().unwrap()
    }

    fn prompts(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_owned()).collect()
    }

    #[test]
    fn test_default_state_is_idle_without_prompts() {
        let state = WorkflowState::default();

        assert_eq!(state.phase, WorkflowPhase::Idle);
        assert!(state.prompts().is_none());
    }

    #[test]
    fn test_rolled_state_replaces_resumed_draft() {
        // Arrange
        let resumed = WorkflowState::resumed(&draft(42, 7, "#a#b#")).unwrap();

        // Act
        let rolled = WorkflowState::rolled(goblins(), 2, prompts(&["x", "y"]));

        // Assert
        assert_eq!(resumed.resuming_draft_id, Some(42));
        assert_eq!(rolled.resuming_draft_id, None);
        assert_eq!(rolled.phase, WorkflowPhase::RolledPrompts);
        assert_eq!(rolled.selector().as_deref(), Some("7_goblins"));
    }

    #[test]
    fn test_open_compose_requires_prompts() {
        let result = WorkflowState::default().open_compose();

        assert!(matches!(result, Err(GatewayError::PreconditionNotMet(_))));
    }

    #[test]
    fn test_open_compose_tolerates_lost_prompts() {
        let state = WorkflowState {
            phase: WorkflowPhase::Composing,
            rolled_prompts: None,
            ..WorkflowState::default()
        };

        assert!(state.open_compose().is_err());
    }

    #[test]
    fn test_stage_encodes_trace() {
        // Arrange
        let state = WorkflowState::rolled(goblins(), 3, prompts(&["p1", "p2", "p3"]))
            .open_compose()
            .unwrap();

        // Act
        let staged = state.stage(Identity::new(1)).unwrap();

        // Assert
        assert_eq!(staged.figures, "#p1#p2#p3#");
        assert_eq!(staged.prompt_set_id.as_deref(), Some("7"));
        assert_eq!(staged.resuming_draft_id, None);
    }

    #[test]
    fn test_stage_requires_composing_phase() {
        let state = WorkflowState::rolled(goblins(), 1, prompts(&["p1"]));

        assert!(matches!(
            state.stage(Identity::new(1)),
            Err(GatewayError::PreconditionNotMet(_))
        ));
    }

    #[test]
    fn test_resumed_draft_enters_composing_with_decoded_prompts() {
        let state = WorkflowState::resumed(&draft(42, 7, "#sunrise#ocean#")).unwrap();

        assert_eq!(state.phase, WorkflowPhase::Composing);
        assert_eq!(state.prompts(), Some(&prompts(&["sunrise", "ocean"])[..]));
        assert_eq!(state.prompt_count, Some(2));
    }

    #[test]
    fn test_resumed_draft_is_owned_by_its_author() {
        // Arrange
        let state = WorkflowState::resumed(&draft(42, 7, "#a#b#")).unwrap();

        // Act
        let by_author = state.stage(Identity::new(7));
        let by_other = state.stage(Identity::new(9));

        // Assert
        assert_eq!(by_author.unwrap().resuming_draft_id, Some(42));
        assert!(matches!(by_other, Err(GatewayError::Unauthorized(_))));
    }

    #[test]
    fn test_owned_roll_rejects_other_submitters() {
        let state = WorkflowState::rolled(goblins(), 1, prompts(&["p1"]))
            .owned_by(Some(3))
            .open_compose()
            .unwrap();

        assert!(matches!(
            state.stage(Identity::new(4)),
            Err(GatewayError::Unauthorized(_))
        ));
        assert!(state.stage(Identity::new(3)).is_ok());
    }

    #[test]
    fn test_unowned_roll_accepts_any_submitter() {
        let state = WorkflowState::rolled(goblins(), 1, prompts(&["p1"]))
            .open_compose()
            .unwrap();

        assert!(state.stage(Identity::new(4)).is_ok());
    }

    #[test]
    fn test_resumed_draft_without_prompts_is_rejected() {
        let result = WorkflowState::resumed(&draft(42, 7, "##"));

        assert!(matches!(result, Err(GatewayError::PreconditionNotMet(_))));
    }

    #[test]
    fn test_state_serializes_with_session_field_names() {
        let state = WorkflowState::rolled(goblins(), 1, prompts(&["p1"]));

        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["id_set"], "7");
        assert_eq!(json["name_set"], "goblins");
        assert_eq!(json["dice_number"], 1);
        assert_eq!(json["figures"][0], "p1");
        assert_eq!(json["phase"], "rolled_prompts");
    }
}
