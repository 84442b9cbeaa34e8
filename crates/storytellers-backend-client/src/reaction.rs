//! Reaction service adapter.

use async_trait::async_trait;
use serde::Serialize;
use storytellers_core::backend::ReactionBackend;
use storytellers_core::identity::{StoryId, UserId};
use storytellers_core::models::{ReactionKind, ReactionStats};
use storytellers_core::outcome::CallOutcome;
use tracing::instrument;

use crate::service_client::ServiceClient;

#[derive(Serialize)]
struct ReactBody {
    user_id: UserId,
    reaction: ReactionKind,
}

/// `ReactionBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReactionBackend {
    client: ServiceClient,
}

impl HttpReactionBackend {
    /// Wraps a client bound to the Reaction service.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReactionBackend for HttpReactionBackend {
    #[instrument(skip(self))]
    async fn story_stats(&self, story_id: StoryId) -> CallOutcome<ReactionStats> {
        self.client
            .get(&format!("/reactions/stories/{story_id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn user_stats(&self, user_id: UserId) -> CallOutcome<ReactionStats> {
        self.client
            .get(&format!("/reactions/users/{user_id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn react(
        &self,
        story_id: StoryId,
        user_id: UserId,
        kind: ReactionKind,
    ) -> CallOutcome<ReactionStats> {
        self.client
            .post(
                &format!("/reactions/stories/{story_id}"),
                &ReactBody {
                    user_id,
                    reaction: kind,
                },
            )
            .await
    }
}
