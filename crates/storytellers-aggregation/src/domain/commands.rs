//! Social and account commands forwarded to the collaborators.

use storytellers_core::command::Command;
use storytellers_core::identity::{Identity, StoryId, UserId};
use storytellers_core::models::{Credentials, NewUser, ReactionKind};
use uuid::Uuid;

/// Command to follow another user.
#[derive(Debug, Clone)]
pub struct FollowUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The caller, who becomes a follower.
    pub follower: Identity,
    /// The user to follow.
    pub user_id: UserId,
}

impl Command for FollowUser {
    fn command_type(&self) -> &'static str {
        "social.follow_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to stop following a user.
#[derive(Debug, Clone)]
pub struct UnfollowUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The caller.
    pub follower: Identity,
    /// The user to unfollow.
    pub user_id: UserId,
}

impl Command for UnfollowUser {
    fn command_type(&self) -> &'static str {
        "social.unfollow_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to like or dislike a story.
#[derive(Debug, Clone)]
pub struct ReactToStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reader reacting.
    pub reader: Identity,
    /// The story reacted to.
    pub story_id: StoryId,
    /// Like or dislike.
    pub kind: ReactionKind,
}

impl Command for ReactToStory {
    fn command_type(&self) -> &'static str {
        "social.react_to_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The registration form.
    pub user: NewUser,
}

impl Command for RegisterUser {
    fn command_type(&self) -> &'static str {
        "account.register_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to verify credentials.
#[derive(Debug, Clone)]
pub struct LogIn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The login form.
    pub credentials: Credentials,
}

impl Command for LogIn {
    fn command_type(&self) -> &'static str {
        "account.log_in"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
