//! Payloads exchanged with the backend collaborators.
//!
//! The gateway is never the source of truth for any of these; they are
//! decoded from, or staged for, a backend call.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{StoryId, UserId};
use crate::trace;

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Email address.
    pub email: String,
}

/// Registration form forwarded to the Identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Email address.
    pub email: String,
    /// Plain password; the Identity service owns hashing and storage.
    pub password: String,
    /// Date of birth.
    pub dateofbirth: NaiveDate,
}

/// Login form forwarded to the Identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// A story as stored by the Narrative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    /// Story identifier.
    pub id: StoryId,
    /// Author of the story.
    pub author_id: UserId,
    /// Story text.
    pub text: String,
    /// `true` while the story is an unpublished draft.
    pub is_draft: bool,
    /// Prompt trace in wire format (`#p1#p2#`).
    pub figures: String,
    /// When the story was last saved.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Id of the prompt set the story was rolled from, when recorded.
    #[serde(default)]
    pub dice_set: Option<String>,
}

impl StoryRecord {
    /// Decodes the prompt trace into the prompts used.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        trace::decode(&self.figures)
    }
}

/// A new story submitted to the Narrative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStory {
    /// Author of the story.
    pub author_id: UserId,
    /// Story text.
    pub text: String,
    /// Save as draft instead of publishing.
    pub is_draft: bool,
    /// Prompt trace in wire format.
    pub figures: String,
    /// Prompt set the prompts were rolled from.
    pub dice_set: Option<String>,
}

/// In-place update of an existing draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryUpdate {
    /// Author issuing the update.
    pub author_id: UserId,
    /// New story text.
    pub text: String,
    /// Keep as draft instead of publishing.
    pub is_draft: bool,
    /// Prompt trace in wire format.
    pub figures: String,
}

/// Story counters for one author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStats {
    /// Published stories.
    pub published: u64,
    /// Unpublished drafts.
    pub drafts: u64,
}

/// Reaction counters for a story or an author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionStats {
    /// Likes received.
    pub likes: u64,
    /// Dislikes received.
    pub dislikes: u64,
}

/// Kind of reaction a reader leaves on a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

/// Entry of the prompt-set catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSetSummary {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl PromptSetSummary {
    /// The combined `<id>_<name>` selector the roll step expects.
    #[must_use]
    pub fn selector(&self) -> String {
        format!("{}_{}", self.id, self.name)
    }
}

/// Which slice of the public story list to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryListing {
    /// Every published story.
    All,
    /// The latest story of each author.
    Latest,
    /// Stories published between two dates (inclusive).
    Range {
        /// Start date.
        begin: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}
