//! Command handlers for the social and account pass-through operations.
//!
//! These forward one write to a collaborator and report the result as a
//! notice next to the view the caller lands on.

use storytellers_core::backend::Backends;
use storytellers_core::command::Command;
use storytellers_core::error::GatewayError;
use storytellers_core::models::{ReactionStats, UserProfile};
use storytellers_core::notice::{Notice, Reply};
use storytellers_core::outcome::CallOutcome;
use tracing::{info, instrument, warn};

use crate::application::query_handlers::get_wall;
use crate::domain::commands::{FollowUser, LogIn, ReactToStory, RegisterUser, UnfollowUser};
use crate::domain::views::WallView;

fn social_notice(outcome: CallOutcome<()>, done: String) -> Result<Notice, GatewayError> {
    match outcome {
        CallOutcome::Success(()) | CallOutcome::EmptySuccess => Ok(Notice::info(done)),
        CallOutcome::ApplicationError { description, .. } => Ok(Notice::error(description)),
        CallOutcome::ServiceUnavailable(service) => Err(GatewayError::ServiceUnavailable(service)),
    }
}

/// Handles the `FollowUser` command, then renders the followed user's wall.
///
/// A refusal by the Identity service (for example an existing follow) is
/// reported as an error notice on the wall rather than as a failure.
///
/// # Errors
///
/// Returns `GatewayError::PreconditionNotMet` when following oneself, and
/// `GatewayError::ServiceUnavailable` if the Identity service is down. Wall
/// rendering errors propagate unchanged.
#[instrument(skip(backends), fields(command_type = command.command_type()))]
pub async fn handle_follow(
    command: &FollowUser,
    backends: &Backends,
) -> Result<Reply<WallView>, GatewayError> {
    if command.follower.is(command.user_id) {
        return Err(GatewayError::PreconditionNotMet(
            "you cannot follow yourself".into(),
        ));
    }
    let outcome = backends
        .identity
        .follow(command.user_id, command.follower.user_id)
        .await;
    let notice = social_notice(outcome, format!("you are now following user {}", command.user_id))?;
    info!(
        correlation_id = %command.correlation_id,
        user_id = command.user_id,
        "follow handled"
    );

    let wall = get_wall(command.user_id, backends).await?;
    Ok(Reply::new(wall).with_notice(notice))
}

/// Handles the `UnfollowUser` command, then renders the user's wall.
///
/// # Errors
///
/// Returns `GatewayError::ServiceUnavailable` if the Identity service is
/// down. Wall rendering errors propagate unchanged.
#[instrument(skip(backends), fields(command_type = command.command_type()))]
pub async fn handle_unfollow(
    command: &UnfollowUser,
    backends: &Backends,
) -> Result<Reply<WallView>, GatewayError> {
    let outcome = backends
        .identity
        .unfollow(command.user_id, command.follower.user_id)
        .await;
    let notice = social_notice(
        outcome,
        format!("you no longer follow user {}", command.user_id),
    )?;
    info!(
        correlation_id = %command.correlation_id,
        user_id = command.user_id,
        "unfollow handled"
    );

    let wall = get_wall(command.user_id, backends).await?;
    Ok(Reply::new(wall).with_notice(notice))
}

/// Handles the `ReactToStory` command and returns the new counters.
///
/// When the Reaction service acknowledges without a body, the counters are
/// read back from it; they are `None` only if that read also yields nothing.
///
/// # Errors
///
/// Returns the Reaction service's error on the write, its description
/// preserved. A failed read-back after a recorded reaction is not an error.
#[instrument(skip(backends), fields(command_type = command.command_type()))]
pub async fn handle_react(
    command: &ReactToStory,
    backends: &Backends,
) -> Result<Reply<Option<ReactionStats>>, GatewayError> {
    let answered = backends
        .reactions
        .react(command.story_id, command.reader.user_id, command.kind)
        .await
        .into_result()?;
    info!(
        correlation_id = %command.correlation_id,
        story_id = command.story_id,
        "reaction recorded"
    );

    let stats = match answered {
        Some(stats) => Some(stats),
        None => match backends.reactions.story_stats(command.story_id).await.into_result() {
            Ok(stats) => stats,
            Err(error) => {
                warn!(story_id = command.story_id, %error, "reaction counters unavailable");
                None
            }
        },
    };
    Ok(Reply::new(stats).with_notice(Notice::info("your reaction was recorded")))
}

/// Handles the `RegisterUser` command.
///
/// # Errors
///
/// Returns the Identity service's error, its description preserved (for
/// example an email that is already registered).
#[instrument(skip_all, fields(command_type = command.command_type()))]
pub async fn handle_register(
    command: &RegisterUser,
    backends: &Backends,
) -> Result<Reply<UserProfile>, GatewayError> {
    let profile = backends
        .identity
        .create_user(&command.user)
        .await
        .into_present(GatewayError::ApplicationRejected(
            "the users service did not return the new account".into(),
        ))?;
    info!(
        correlation_id = %command.correlation_id,
        user_id = profile.id,
        "user registered"
    );
    Ok(Reply::new(profile).with_notice(Notice::info("registration complete")))
}

/// Handles the `LogIn` command and returns the verified profile.
///
/// # Errors
///
/// Returns `GatewayError::Unauthorized` if the Identity service answers
/// without a profile, otherwise the service's error verbatim.
#[instrument(skip_all, fields(command_type = command.command_type()))]
pub async fn handle_log_in(
    command: &LogIn,
    backends: &Backends,
) -> Result<Reply<UserProfile>, GatewayError> {
    let profile = backends
        .identity
        .login(&command.credentials)
        .await
        .into_present(GatewayError::Unauthorized("the credentials were not accepted".into()))?;
    info!(
        correlation_id = %command.correlation_id,
        user_id = profile.id,
        "user logged in"
    );
    let greeting = Notice::info(format!("welcome back, {}", profile.firstname));
    Ok(Reply::new(profile).with_notice(greeting))
}
