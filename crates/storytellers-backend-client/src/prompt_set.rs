//! Prompt-set (dice) service adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storytellers_core::backend::PromptSetBackend;
use storytellers_core::models::PromptSetSummary;
use storytellers_core::outcome::CallOutcome;
use tracing::instrument;

use crate::service_client::ServiceClient;

#[derive(Serialize)]
struct RollBody {
    dice_number: u32,
}

#[derive(Deserialize)]
struct RollAnswer {
    figures: Vec<String>,
}

/// `PromptSetBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPromptSetBackend {
    client: ServiceClient,
}

impl HttpPromptSetBackend {
    /// Wraps a client bound to the prompt-set service.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PromptSetBackend for HttpPromptSetBackend {
    #[instrument(skip(self))]
    async fn list_sets(&self) -> CallOutcome<Vec<PromptSetSummary>> {
        self.client.get("/dice/sets").await
    }

    #[instrument(skip(self))]
    async fn roll(&self, set_id: &str, count: u32) -> CallOutcome<Vec<String>> {
        self.client
            .post::<_, RollAnswer>(
                &format!("/dice/sets/{set_id}/roll"),
                &RollBody { dice_number: count },
            )
            .await
            .map(|answer| answer.figures)
    }
}
