//! Payload fixtures.

use storytellers_core::identity::{StoryId, UserId};
use storytellers_core::models::{PromptSetSummary, StoryRecord, UserProfile};

/// A user profile whose fields are derived from `id`.
#[must_use]
pub fn user(id: UserId) -> UserProfile {
    UserProfile {
        id,
        firstname: format!("First{id}"),
        lastname: format!("Last{id}"),
        email: format!("user{id}@example.com"),
    }
}

/// A published story carrying the given prompt trace.
#[must_use]
pub fn story(id: StoryId, author_id: UserId, figures: &str) -> StoryRecord {
    StoryRecord {
        id,
        author_id,
        text: format!("Story {id} by user {author_id}"),
        is_draft: false,
        figures: figures.to_owned(),
        date: None,
        dice_set: None,
    }
}

/// An unpublished story carrying the given prompt trace.
#[must_use]
pub fn draft(id: StoryId, author_id: UserId, figures: &str) -> StoryRecord {
    StoryRecord {
        is_draft: true,
        ..story(id, author_id, figures)
    }
}

/// A prompt set summary.
#[must_use]
pub fn prompt_set(id: &str, name: &str) -> PromptSetSummary {
    PromptSetSummary {
        id: id.to_owned(),
        name: name.to_owned(),
    }
}
