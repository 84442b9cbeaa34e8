//! Scripted collaborator implementations for tests.
//!
//! Every stub answers each operation with the outcome stored in its public
//! field (`EmptySuccess` unless overridden), counts calls, records writes,
//! and optionally sleeps before answering.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storytellers_core::backend::{
    Backends, IdentityBackend, NarrativeBackend, PromptSetBackend, ReactionBackend,
};
use storytellers_core::identity::{StoryId, UserId};
use storytellers_core::models::{
    Credentials, NewStory, NewUser, PromptSetSummary, ReactionKind, ReactionStats, StoryListing,
    StoryRecord, StoryStats, StoryUpdate, UserProfile,
};
use storytellers_core::outcome::CallOutcome;

/// Call counting and artificial latency shared by every stub.
#[derive(Debug, Default)]
pub struct Latency {
    /// Sleep before every answer.
    pub delay: Duration,
    /// Calls received so far.
    pub calls: AtomicUsize,
}

impl Latency {
    async fn answer<T: Clone>(&self, outcome: &CallOutcome<T>) -> CallOutcome<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        outcome.clone()
    }
}

/// Scripted identity collaborator.
#[derive(Debug)]
pub struct StubIdentity {
    /// Answer to `get_user`.
    pub user: CallOutcome<UserProfile>,
    /// Answer to `list_users`.
    pub users: CallOutcome<Vec<UserProfile>>,
    /// Answer to `followers`.
    pub followers: CallOutcome<Vec<UserProfile>>,
    /// Answer to `follow` and `unfollow`.
    pub follow: CallOutcome<()>,
    /// Answer to `search_users`.
    pub search: CallOutcome<Vec<UserProfile>>,
    /// Answer to `create_user` and `login`.
    pub account: CallOutcome<UserProfile>,
    /// `(user_id, follower_id)` of every follow.
    pub follows: Mutex<Vec<(UserId, UserId)>>,
    /// `(user_id, follower_id)` of every unfollow.
    pub unfollows: Mutex<Vec<(UserId, UserId)>>,
    /// Call counter and artificial latency.
    pub latency: Latency,
}

impl Default for StubIdentity {
    fn default() -> Self {
        Self {
            user: CallOutcome::EmptySuccess,
            users: CallOutcome::EmptySuccess,
            followers: CallOutcome::EmptySuccess,
            follow: CallOutcome::EmptySuccess,
            search: CallOutcome::EmptySuccess,
            account: CallOutcome::EmptySuccess,
            follows: Mutex::new(Vec::new()),
            unfollows: Mutex::new(Vec::new()),
            latency: Latency::default(),
        }
    }
}

impl StubIdentity {
    /// Delays every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.latency.delay = delay;
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.latency.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityBackend for StubIdentity {
    async fn get_user(&self, _user_id: UserId) -> CallOutcome<UserProfile> {
        self.latency.answer(&self.user).await
    }

    async fn list_users(&self) -> CallOutcome<Vec<UserProfile>> {
        self.latency.answer(&self.users).await
    }

    async fn followers(&self, _user_id: UserId) -> CallOutcome<Vec<UserProfile>> {
        self.latency.answer(&self.followers).await
    }

    async fn follow(&self, user_id: UserId, follower_id: UserId) -> CallOutcome<()> {
        self.follows.lock().unwrap().push((user_id, follower_id));
        self.latency.answer(&self.follow).await
    }

    async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> CallOutcome<()> {
        self.unfollows.lock().unwrap().push((user_id, follower_id));
        self.latency.answer(&self.follow).await
    }

    async fn search_users(&self, _query: &str) -> CallOutcome<Vec<UserProfile>> {
        self.latency.answer(&self.search).await
    }

    async fn create_user(&self, _user: &NewUser) -> CallOutcome<UserProfile> {
        self.latency.answer(&self.account).await
    }

    async fn login(&self, _credentials: &Credentials) -> CallOutcome<UserProfile> {
        self.latency.answer(&self.account).await
    }
}

/// Scripted narrative collaborator.
#[derive(Debug)]
pub struct StubNarrative {
    /// Answer to `get_story` and `random_story`.
    pub story: CallOutcome<StoryRecord>,
    /// Answer to every story list operation.
    pub stories: CallOutcome<Vec<StoryRecord>>,
    /// Answer to `story_stats`.
    pub stats: CallOutcome<StoryStats>,
    /// Answer to `search_stories`.
    pub search: CallOutcome<Vec<StoryRecord>>,
    /// Answer to `create_story` and `update_story`.
    pub saved: CallOutcome<StoryRecord>,
    /// Every story creation received.
    pub created: Mutex<Vec<NewStory>>,
    /// Every story update received.
    pub updated: Mutex<Vec<(StoryId, StoryUpdate)>>,
    /// Every listing requested.
    pub listings: Mutex<Vec<StoryListing>>,
    /// Call counter and artificial latency.
    pub latency: Latency,
}

impl Default for StubNarrative {
    fn default() -> Self {
        Self {
            story: CallOutcome::EmptySuccess,
            stories: CallOutcome::EmptySuccess,
            stats: CallOutcome::EmptySuccess,
            search: CallOutcome::EmptySuccess,
            saved: CallOutcome::EmptySuccess,
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            listings: Mutex::new(Vec::new()),
            latency: Latency::default(),
        }
    }
}

impl StubNarrative {
    /// Delays every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.latency.delay = delay;
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.latency.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeBackend for StubNarrative {
    async fn get_story(&self, _story_id: StoryId) -> CallOutcome<StoryRecord> {
        self.latency.answer(&self.story).await
    }

    async fn list_stories(&self, listing: &StoryListing) -> CallOutcome<Vec<StoryRecord>> {
        self.listings.lock().unwrap().push(listing.clone());
        self.latency.answer(&self.stories).await
    }

    async fn random_story(&self) -> CallOutcome<StoryRecord> {
        self.latency.answer(&self.story).await
    }

    async fn stories_of_user(&self, _user_id: UserId) -> CallOutcome<Vec<StoryRecord>> {
        self.latency.answer(&self.stories).await
    }

    async fn drafts_of_user(&self, _user_id: UserId) -> CallOutcome<Vec<StoryRecord>> {
        self.latency.answer(&self.stories).await
    }

    async fn story_stats(&self, _user_id: UserId) -> CallOutcome<StoryStats> {
        self.latency.answer(&self.stats).await
    }

    async fn search_stories(&self, _query: &str) -> CallOutcome<Vec<StoryRecord>> {
        self.latency.answer(&self.search).await
    }

    async fn create_story(&self, story: &NewStory) -> CallOutcome<StoryRecord> {
        self.created.lock().unwrap().push(story.clone());
        self.latency.answer(&self.saved).await
    }

    async fn update_story(
        &self,
        story_id: StoryId,
        update: &StoryUpdate,
    ) -> CallOutcome<StoryRecord> {
        self.updated.lock().unwrap().push((story_id, update.clone()));
        self.latency.answer(&self.saved).await
    }
}

/// Scripted prompt-set collaborator.
#[derive(Debug)]
pub struct StubPromptSets {
    /// Answer to `list_sets`.
    pub sets: CallOutcome<Vec<PromptSetSummary>>,
    /// Answer to `roll`.
    pub roll: CallOutcome<Vec<String>>,
    /// `(set_id, count)` of every roll.
    pub rolls: Mutex<Vec<(String, u32)>>,
    /// Call counter and artificial latency.
    pub latency: Latency,
}

impl Default for StubPromptSets {
    fn default() -> Self {
        Self {
            sets: CallOutcome::EmptySuccess,
            roll: CallOutcome::EmptySuccess,
            rolls: Mutex::new(Vec::new()),
            latency: Latency::default(),
        }
    }
}

impl StubPromptSets {
    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.latency.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptSetBackend for StubPromptSets {
    async fn list_sets(&self) -> CallOutcome<Vec<PromptSetSummary>> {
        self.latency.answer(&self.sets).await
    }

    async fn roll(&self, set_id: &str, count: u32) -> CallOutcome<Vec<String>> {
        self.rolls.lock().unwrap().push((set_id.to_owned(), count));
        self.latency.answer(&self.roll).await
    }
}

/// Scripted reaction collaborator.
#[derive(Debug)]
pub struct StubReactions {
    /// Answer to `story_stats` and `user_stats`.
    pub stats: CallOutcome<ReactionStats>,
    /// Answer to `react`.
    pub react: CallOutcome<ReactionStats>,
    /// `(story_id, user_id, kind)` of every reaction.
    pub reactions: Mutex<Vec<(StoryId, UserId, ReactionKind)>>,
    /// Call counter and artificial latency.
    pub latency: Latency,
}

impl Default for StubReactions {
    fn default() -> Self {
        Self {
            stats: CallOutcome::EmptySuccess,
            react: CallOutcome::EmptySuccess,
            reactions: Mutex::new(Vec::new()),
            latency: Latency::default(),
        }
    }
}

impl StubReactions {
    /// Delays every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.latency.delay = delay;
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.latency.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReactionBackend for StubReactions {
    async fn story_stats(&self, _story_id: StoryId) -> CallOutcome<ReactionStats> {
        self.latency.answer(&self.stats).await
    }

    async fn user_stats(&self, _user_id: UserId) -> CallOutcome<ReactionStats> {
        self.latency.answer(&self.stats).await
    }

    async fn react(
        &self,
        story_id: StoryId,
        user_id: UserId,
        kind: ReactionKind,
    ) -> CallOutcome<ReactionStats> {
        self.reactions.lock().unwrap().push((story_id, user_id, kind));
        self.latency.answer(&self.react).await
    }
}

/// The four stubs, kept so tests can inspect them after wiring.
#[derive(Debug, Clone, Default)]
pub struct StubBackends {
    /// Identity stub.
    pub identity: Arc<StubIdentity>,
    /// Narrative stub.
    pub narrative: Arc<StubNarrative>,
    /// Prompt-set stub.
    pub prompts: Arc<StubPromptSets>,
    /// Reaction stub.
    pub reactions: Arc<StubReactions>,
}

impl StubBackends {
    /// Wires the stubs as the gateway's collaborators.
    #[must_use]
    pub fn backends(&self) -> Backends {
        Backends {
            identity: self.identity.clone(),
            narrative: self.narrative.clone(),
            prompts: self.prompts.clone(),
            reactions: self.reactions.clone(),
        }
    }
}
