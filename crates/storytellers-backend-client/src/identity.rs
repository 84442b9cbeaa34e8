//! Identity service adapter.

use async_trait::async_trait;
use serde::Serialize;
use storytellers_core::backend::IdentityBackend;
use storytellers_core::identity::UserId;
use storytellers_core::models::{Credentials, NewUser, UserProfile};
use storytellers_core::outcome::CallOutcome;
use tracing::instrument;

use crate::service_client::ServiceClient;

#[derive(Serialize)]
struct FollowBody {
    follower_id: UserId,
}

/// `IdentityBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIdentityBackend {
    client: ServiceClient,
}

impl HttpIdentityBackend {
    /// Wraps a client bound to the Identity service.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityBackend for HttpIdentityBackend {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> CallOutcome<UserProfile> {
        self.client.get(&format!("/users/{user_id}")).await
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> CallOutcome<Vec<UserProfile>> {
        self.client.get("/users").await
    }

    #[instrument(skip(self))]
    async fn followers(&self, user_id: UserId) -> CallOutcome<Vec<UserProfile>> {
        self.client.get(&format!("/users/{user_id}/followers")).await
    }

    #[instrument(skip(self))]
    async fn follow(&self, user_id: UserId, follower_id: UserId) -> CallOutcome<()> {
        self.client
            .post_discarding(&format!("/users/{user_id}/follow"), &FollowBody { follower_id })
            .await
    }

    #[instrument(skip(self))]
    async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> CallOutcome<()> {
        self.client
            .post_discarding(
                &format!("/users/{user_id}/unfollow"),
                &FollowBody { follower_id },
            )
            .await
    }

    #[instrument(skip(self))]
    async fn search_users(&self, query: &str) -> CallOutcome<Vec<UserProfile>> {
        self.client
            .get_with_query("/search", &[("query", query)])
            .await
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> CallOutcome<UserProfile> {
        self.client.post("/users/create", user).await
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> CallOutcome<UserProfile> {
        self.client.post("/users/login", credentials).await
    }
}
