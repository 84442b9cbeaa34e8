//! Backend adapter traits.
//!
//! One trait per collaborator. Implementations must bound every call with a
//! timeout and report a hung or failing collaborator as
//! `CallOutcome::ServiceUnavailable`; they never panic or return a
//! transport error to the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::identity::{StoryId, UserId};
use crate::models::{
    Credentials, NewStory, NewUser, PromptSetSummary, ReactionKind, ReactionStats, StoryListing,
    StoryRecord, StoryStats, StoryUpdate, UserProfile,
};
use crate::outcome::CallOutcome;

/// Users, credentials and follower relationships.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Fetch one user's profile.
    async fn get_user(&self, user_id: UserId) -> CallOutcome<UserProfile>;

    /// List every registered user.
    async fn list_users(&self) -> CallOutcome<Vec<UserProfile>>;

    /// List the followers of a user.
    async fn followers(&self, user_id: UserId) -> CallOutcome<Vec<UserProfile>>;

    /// Make `follower_id` follow `user_id`.
    async fn follow(&self, user_id: UserId, follower_id: UserId) -> CallOutcome<()>;

    /// Make `follower_id` stop following `user_id`.
    async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> CallOutcome<()>;

    /// Users whose names or email match the query.
    async fn search_users(&self, query: &str) -> CallOutcome<Vec<UserProfile>>;

    /// Register a new user.
    async fn create_user(&self, user: &NewUser) -> CallOutcome<UserProfile>;

    /// Verify credentials and return the matching profile.
    async fn login(&self, credentials: &Credentials) -> CallOutcome<UserProfile>;
}

/// Stories and drafts.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Fetch one story, draft or not.
    async fn get_story(&self, story_id: StoryId) -> CallOutcome<StoryRecord>;

    /// Published stories, filtered by `listing`.
    async fn list_stories(&self, listing: &StoryListing) -> CallOutcome<Vec<StoryRecord>>;

    /// One random published story.
    async fn random_story(&self) -> CallOutcome<StoryRecord>;

    /// Published stories of one author.
    async fn stories_of_user(&self, user_id: UserId) -> CallOutcome<Vec<StoryRecord>>;

    /// Drafts of one author.
    async fn drafts_of_user(&self, user_id: UserId) -> CallOutcome<Vec<StoryRecord>>;

    /// Story counters of one author.
    async fn story_stats(&self, user_id: UserId) -> CallOutcome<StoryStats>;

    /// Stories whose text matches the query.
    async fn search_stories(&self, query: &str) -> CallOutcome<Vec<StoryRecord>>;

    /// Create a story or draft.
    async fn create_story(&self, story: &NewStory) -> CallOutcome<StoryRecord>;

    /// Update an existing draft in place.
    async fn update_story(&self, story_id: StoryId, update: &StoryUpdate)
    -> CallOutcome<StoryRecord>;
}

/// Prompt catalogs and rolls.
#[async_trait]
pub trait PromptSetBackend: Send + Sync {
    /// The catalog of prompt sets.
    async fn list_sets(&self) -> CallOutcome<Vec<PromptSetSummary>>;

    /// Roll `count` prompts from one set.
    async fn roll(&self, set_id: &str, count: u32) -> CallOutcome<Vec<String>>;
}

/// Likes and dislikes.
#[async_trait]
pub trait ReactionBackend: Send + Sync {
    /// Counters for one story.
    async fn story_stats(&self, story_id: StoryId) -> CallOutcome<ReactionStats>;

    /// Counters across every story of one author.
    async fn user_stats(&self, user_id: UserId) -> CallOutcome<ReactionStats>;

    /// Record a reaction and return the story's new counters.
    async fn react(
        &self,
        story_id: StoryId,
        user_id: UserId,
        kind: ReactionKind,
    ) -> CallOutcome<ReactionStats>;
}

/// The four collaborators, shared across request handlers.
#[derive(Clone)]
pub struct Backends {
    /// Identity service adapter.
    pub identity: Arc<dyn IdentityBackend>,
    /// Narrative service adapter.
    pub narrative: Arc<dyn NarrativeBackend>,
    /// Prompt-set service adapter.
    pub prompts: Arc<dyn PromptSetBackend>,
    /// Reaction service adapter.
    pub reactions: Arc<dyn ReactionBackend>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}
