//! Commands for the authoring workflow.

use std::fmt;
use std::str::FromStr;

use storytellers_core::command::Command;
use storytellers_core::error::GatewayError;
use storytellers_core::identity::{Identity, SessionId, StoryId};
use uuid::Uuid;

/// A prompt set chosen on the settings page, submitted as `<id>_<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSetSelector {
    /// Prompt set id; safe to place in a URL path.
    pub id: String,
    /// Prompt set display name; may itself contain underscores.
    pub name: String,
}

impl FromStr for PromptSetSelector {
    type Err = GatewayError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            GatewayError::PreconditionNotMet(format!(
                "{selector:?} is not a valid prompt set selection"
            ))
        };
        let (id, name) = selector.split_once('_').ok_or_else(invalid)?;
        let id_is_safe = id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if id.is_empty() || !id_is_safe || name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            id: id.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl fmt::Display for PromptSetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name)
    }
}

/// Command to roll a fresh set of prompts.
#[derive(Debug, Clone)]
pub struct RollPrompts {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session being driven.
    pub session: SessionId,
    /// The caller, when logged in; the flow is bound to them.
    pub roller: Option<Identity>,
    /// How many prompts to roll.
    pub prompt_count: u32,
    /// Raw `<id>_<name>` selection.
    pub selector: String,
}

impl Command for RollPrompts {
    fn command_type(&self) -> &'static str {
        "workflow.roll_prompts"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to open the editor on the rolled prompts.
#[derive(Debug, Clone)]
pub struct OpenCompose {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session being driven.
    pub session: SessionId,
}

impl Command for OpenCompose {
    fn command_type(&self) -> &'static str {
        "workflow.open_compose"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to publish the story or save it as a draft.
#[derive(Debug, Clone)]
pub struct SubmitStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session being driven.
    pub session: SessionId,
    /// The author.
    pub author: Identity,
    /// Story text.
    pub text: String,
    /// `true` to save without publishing.
    pub as_draft: bool,
}

impl Command for SubmitStory {
    fn command_type(&self) -> &'static str {
        "workflow.submit_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to re-open one of the caller's drafts.
#[derive(Debug, Clone)]
pub struct ResumeDraft {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session being driven.
    pub session: SessionId,
    /// The requester; must be the draft's author.
    pub requester: Identity,
    /// The draft to edit.
    pub story_id: StoryId,
}

impl Command for ResumeDraft {
    fn command_type(&self) -> &'static str {
        "workflow.resume_draft"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to drop whatever the session was writing.
#[derive(Debug, Clone)]
pub struct Abandon {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session being reset.
    pub session: SessionId,
}

impl Command for Abandon {
    fn command_type(&self) -> &'static str {
        "workflow.abandon"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
