//! Query handlers for the read side of the gateway.
//!
//! Each handler declares its sub-requests, gathers them through the
//! aggregator and decodes the merged view into a typed read model.

use chrono::NaiveDate;
use storytellers_core::backend::Backends;
use storytellers_core::error::GatewayError;
use storytellers_core::identity::{Identity, StoryId, UserId};
use storytellers_core::models::{ReactionStats, StoryListing, StoryRecord, StoryStats, UserProfile};
use tracing::instrument;

use crate::application::aggregator::{SubRequest, gather};
use crate::domain::policy::require_any;
use crate::domain::views::{
    FollowersView, HomeView, SearchView, StoryListView, StorySummary, StoryView, UserListView,
    WallView, slots, summarize,
};

/// Renders a user's wall.
///
/// The profile is required; followers, story counters and reaction counters
/// are optional and fall back to zero-value blocks.
///
/// # Errors
///
/// Returns the profile lookup's error, or `GatewayError::NotFound` if the
/// Identity service answered without a profile.
#[instrument(skip(backends))]
pub async fn get_wall(user_id: UserId, backends: &Backends) -> Result<WallView, GatewayError> {
    let view = gather(vec![
        SubRequest::required(slots::PROFILE, backends.identity.get_user(user_id)),
        SubRequest::optional(slots::FOLLOWERS, backends.identity.followers(user_id)),
        SubRequest::optional(slots::STORY_STATS, backends.narrative.story_stats(user_id)),
        SubRequest::optional(slots::REACTION_STATS, backends.reactions.user_stats(user_id)),
    ])
    .await?;

    let profile: UserProfile = view
        .payload(slots::PROFILE)?
        .ok_or_else(|| GatewayError::NotFound(format!("user {user_id} does not exist")))?;
    let followers: Vec<UserProfile> = view.payload_or_default(slots::FOLLOWERS)?;
    let story_stats: StoryStats = view.payload_or_default(slots::STORY_STATS)?;
    let reaction_stats: ReactionStats = view.payload_or_default(slots::REACTION_STATS)?;

    Ok(WallView {
        profile,
        followers: u64::try_from(followers.len()).unwrap_or(u64::MAX),
        story_stats,
        reaction_stats,
        degraded: view.degradations(),
    })
}

/// Renders a narrative with its author and reactions.
///
/// The record is fetched first; the author (required) and the reaction
/// counters (optional) are then fetched concurrently. A draft is only
/// visible to its author.
///
/// # Errors
///
/// Returns `GatewayError::NotFound` if the story or its author does not
/// exist, `GatewayError::Unauthorized` if a draft is requested by someone
/// other than its author, and `GatewayError::ServiceUnavailable` if the
/// Narrative or Identity service is down.
#[instrument(skip(backends))]
pub async fn get_story_view(
    story_id: StoryId,
    viewer: Option<Identity>,
    backends: &Backends,
) -> Result<StoryView, GatewayError> {
    let mut view = gather(vec![SubRequest::required(
        slots::STORY,
        backends.narrative.get_story(story_id),
    )])
    .await?;
    let story: StoryRecord = view
        .payload(slots::STORY)?
        .ok_or_else(|| GatewayError::NotFound(format!("story {story_id} does not exist")))?;

    if story.is_draft && !viewer.is_some_and(|v| v.is(story.author_id)) {
        return Err(GatewayError::Unauthorized(format!(
            "story {story_id} is a draft of another author"
        )));
    }

    let related = gather(vec![
        SubRequest::required(slots::AUTHOR, backends.identity.get_user(story.author_id)),
        SubRequest::optional(slots::REACTION_STATS, backends.reactions.story_stats(story_id)),
    ])
    .await
    .map_err(|error| match error {
        GatewayError::ApplicationRejected(description) => GatewayError::NotFound(description),
        other => other,
    })?;
    view.extend(related);

    let author: UserProfile = view.payload(slots::AUTHOR)?.ok_or_else(|| {
        GatewayError::NotFound(format!("author {} does not exist", story.author_id))
    })?;
    let reactions: ReactionStats = view.payload_or_default(slots::REACTION_STATS)?;

    Ok(StoryView {
        story: StorySummary::from(story),
        author,
        reactions,
        degraded: view.degradations(),
    })
}

/// Searches users and stories at once.
///
/// # Errors
///
/// Fails only when neither source produced usable data.
#[instrument(skip(backends))]
pub async fn search(query: &str, backends: &Backends) -> Result<SearchView, GatewayError> {
    let view = require_any(
        gather(vec![
            SubRequest::optional(slots::USERS, backends.identity.search_users(query)),
            SubRequest::optional(slots::STORIES, backends.narrative.search_stories(query)),
        ])
        .await?,
    )?;

    let users: Vec<UserProfile> = view.payload_or_default(slots::USERS)?;
    let stories: Vec<StoryRecord> = view.payload_or_default(slots::STORIES)?;

    Ok(SearchView {
        query: query.to_owned(),
        users,
        stories: summarize(stories),
        degraded: view.degradations(),
    })
}

/// Renders the home page: the caller's own stories, if logged in.
///
/// # Errors
///
/// Returns `GatewayError::ApplicationRejected` only if the Narrative
/// service answers with an unreadable payload.
#[instrument(skip(backends))]
pub async fn get_home(
    identity: Option<Identity>,
    backends: &Backends,
) -> Result<HomeView, GatewayError> {
    let Some(identity) = identity else {
        return Ok(HomeView {
            stories: Vec::new(),
            degraded: Vec::new(),
        });
    };

    let view = gather(vec![SubRequest::optional(
        slots::STORIES,
        backends.narrative.stories_of_user(identity.user_id),
    )])
    .await?;
    let stories: Vec<StoryRecord> = view.payload_or_default(slots::STORIES)?;

    Ok(HomeView {
        stories: summarize(stories),
        degraded: view.degradations(),
    })
}

/// Lists every user.
///
/// # Errors
///
/// Returns the Identity service's error.
#[instrument(skip(backends))]
pub async fn list_users(backends: &Backends) -> Result<UserListView, GatewayError> {
    let users = backends.identity.list_users().await.into_collection()?;
    Ok(UserListView { users })
}

/// Lists a user's followers.
///
/// # Errors
///
/// Returns the Identity service's error.
#[instrument(skip(backends))]
pub async fn get_followers(
    user_id: UserId,
    backends: &Backends,
) -> Result<FollowersView, GatewayError> {
    let followers = backends.identity.followers(user_id).await.into_collection()?;
    Ok(FollowersView { user_id, followers })
}

/// Lists a user's published stories.
///
/// # Errors
///
/// Returns the Narrative service's error.
#[instrument(skip(backends))]
pub async fn get_user_stories(
    user_id: UserId,
    backends: &Backends,
) -> Result<StoryListView, GatewayError> {
    let stories = backends
        .narrative
        .stories_of_user(user_id)
        .await
        .into_collection()?;
    Ok(StoryListView {
        stories: summarize(stories),
    })
}

/// Lists the caller's drafts.
///
/// # Errors
///
/// Returns the Narrative service's error.
#[instrument(skip(backends))]
pub async fn get_drafts(
    identity: Identity,
    backends: &Backends,
) -> Result<StoryListView, GatewayError> {
    let stories = backends
        .narrative
        .drafts_of_user(identity.user_id)
        .await
        .into_collection()?;
    Ok(StoryListView {
        stories: summarize(stories),
    })
}

/// Lists published stories.
///
/// # Errors
///
/// Returns `GatewayError::PreconditionNotMet` for a range whose beginning
/// is after its end, otherwise the Narrative service's error.
#[instrument(skip(backends))]
pub async fn list_stories(
    listing: &StoryListing,
    backends: &Backends,
) -> Result<StoryListView, GatewayError> {
    if let StoryListing::Range { begin, end } = listing {
        check_range(*begin, *end)?;
    }
    let stories = backends
        .narrative
        .list_stories(listing)
        .await
        .into_collection()?;
    Ok(StoryListView {
        stories: summarize(stories),
    })
}

fn check_range(begin: NaiveDate, end: NaiveDate) -> Result<(), GatewayError> {
    if begin > end {
        return Err(GatewayError::PreconditionNotMet(format!(
            "the range begins on {begin}, after its end on {end}"
        )));
    }
    Ok(())
}

/// Picks one published story at random.
///
/// # Errors
///
/// Returns `GatewayError::NotFound` if there are no stories, otherwise the
/// Narrative service's error.
#[instrument(skip(backends))]
pub async fn get_random_story(backends: &Backends) -> Result<StorySummary, GatewayError> {
    let story = backends
        .narrative
        .random_story()
        .await
        .into_present(GatewayError::NotFound("there are no stories yet".into()))?;
    Ok(StorySummary::from(story))
}
