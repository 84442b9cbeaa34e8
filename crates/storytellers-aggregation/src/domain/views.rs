//! Typed read models built from aggregated views.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storytellers_core::identity::{StoryId, UserId};
use storytellers_core::models::{ReactionStats, StoryRecord, StoryStats, UserProfile};

use super::view::Degradation;

/// Slot names shared by the query handlers.
pub mod slots {
    /// The primary user profile of a wall.
    pub const PROFILE: &str = "profile";
    /// Followers of a user.
    pub const FOLLOWERS: &str = "followers";
    /// Story counters of an author.
    pub const STORY_STATS: &str = "story-stats";
    /// Reaction counters of a story or author.
    pub const REACTION_STATS: &str = "reaction-stats";
    /// A single story record.
    pub const STORY: &str = "story";
    /// The author of a story.
    pub const AUTHOR: &str = "author";
    /// A list of stories.
    pub const STORIES: &str = "stories";
    /// A list of users.
    pub const USERS: &str = "users";
}

/// A story with its prompt trace decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySummary {
    /// Story identifier.
    pub id: StoryId,
    /// Author of the story.
    pub author_id: UserId,
    /// Story text.
    pub text: String,
    /// `true` while unpublished.
    pub is_draft: bool,
    /// When the story was last saved.
    pub date: Option<DateTime<Utc>>,
    /// Prompts the story was written from.
    pub prompts: Vec<String>,
}

impl From<StoryRecord> for StorySummary {
    fn from(record: StoryRecord) -> Self {
        let prompts = record.prompts();
        Self {
            id: record.id,
            author_id: record.author_id,
            text: record.text,
            is_draft: record.is_draft,
            date: record.date,
            prompts,
        }
    }
}

/// Converts a list of records, decoding every trace.
#[must_use]
pub fn summarize(records: Vec<StoryRecord>) -> Vec<StorySummary> {
    records.into_iter().map(StorySummary::from).collect()
}

/// A user's wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WallView {
    /// Whose wall this is.
    pub profile: UserProfile,
    /// Number of followers.
    pub followers: u64,
    /// Story counters; zero when unavailable.
    pub story_stats: StoryStats,
    /// Reaction counters; zero when unavailable.
    pub reaction_stats: ReactionStats,
    /// Sections rendered from zero-value blocks.
    pub degraded: Vec<Degradation>,
}

/// A rendered narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryView {
    /// The story with its decoded prompts.
    pub story: StorySummary,
    /// The author's profile.
    pub author: UserProfile,
    /// Reaction counters; zero when unavailable.
    pub reactions: ReactionStats,
    /// Sections rendered from zero-value blocks.
    pub degraded: Vec<Degradation>,
}

/// Two-source search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    /// The search term as received.
    pub query: String,
    /// Matching users.
    pub users: Vec<UserProfile>,
    /// Matching stories.
    pub stories: Vec<StorySummary>,
    /// Sources that could not be searched.
    pub degraded: Vec<Degradation>,
}

/// The home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    /// The logged-in user's stories; empty when anonymous.
    pub stories: Vec<StorySummary>,
    /// Sections rendered empty because a collaborator failed.
    pub degraded: Vec<Degradation>,
}

/// A list of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListView {
    /// The users.
    pub users: Vec<UserProfile>,
}

/// Followers of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowersView {
    /// The followed user.
    pub user_id: UserId,
    /// Their followers.
    pub followers: Vec<UserProfile>,
}

/// A list of stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryListView {
    /// The stories.
    pub stories: Vec<StorySummary>,
}
