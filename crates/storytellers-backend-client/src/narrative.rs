//! Narrative service adapter.

use async_trait::async_trait;
use storytellers_core::backend::NarrativeBackend;
use storytellers_core::identity::{StoryId, UserId};
use storytellers_core::models::{NewStory, StoryListing, StoryRecord, StoryStats, StoryUpdate};
use storytellers_core::outcome::CallOutcome;
use tracing::instrument;

use crate::service_client::ServiceClient;

/// `NarrativeBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNarrativeBackend {
    client: ServiceClient,
}

impl HttpNarrativeBackend {
    /// Wraps a client bound to the Narrative service.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NarrativeBackend for HttpNarrativeBackend {
    #[instrument(skip(self))]
    async fn get_story(&self, story_id: StoryId) -> CallOutcome<StoryRecord> {
        self.client.get(&format!("/stories/{story_id}")).await
    }

    #[instrument(skip(self))]
    async fn list_stories(&self, listing: &StoryListing) -> CallOutcome<Vec<StoryRecord>> {
        match listing {
            StoryListing::All => self.client.get("/stories").await,
            StoryListing::Latest => self.client.get("/stories/latest").await,
            StoryListing::Range { begin, end } => {
                self.client
                    .get_with_query(
                        "/stories/range",
                        &[("begin", begin.to_string()), ("end", end.to_string())],
                    )
                    .await
            }
        }
    }

    #[instrument(skip(self))]
    async fn random_story(&self) -> CallOutcome<StoryRecord> {
        self.client.get("/stories/random").await
    }

    #[instrument(skip(self))]
    async fn stories_of_user(&self, user_id: UserId) -> CallOutcome<Vec<StoryRecord>> {
        self.client.get(&format!("/stories/users/{user_id}")).await
    }

    #[instrument(skip(self))]
    async fn drafts_of_user(&self, user_id: UserId) -> CallOutcome<Vec<StoryRecord>> {
        self.client
            .get(&format!("/stories/users/{user_id}/drafts"))
            .await
    }

    #[instrument(skip(self))]
    async fn story_stats(&self, user_id: UserId) -> CallOutcome<StoryStats> {
        self.client
            .get(&format!("/stories/users/{user_id}/stats"))
            .await
    }

    #[instrument(skip(self))]
    async fn search_stories(&self, query: &str) -> CallOutcome<Vec<StoryRecord>> {
        self.client
            .get_with_query("/search", &[("query", query)])
            .await
    }

    #[instrument(skip(self, story), fields(author_id = story.author_id, is_draft = story.is_draft))]
    async fn create_story(&self, story: &NewStory) -> CallOutcome<StoryRecord> {
        self.client.post("/stories", story).await
    }

    #[instrument(skip(self, update), fields(is_draft = update.is_draft))]
    async fn update_story(
        &self,
        story_id: StoryId,
        update: &StoryUpdate,
    ) -> CallOutcome<StoryRecord> {
        self.client
            .put(&format!("/stories/{story_id}"), update)
            .await
    }
}
