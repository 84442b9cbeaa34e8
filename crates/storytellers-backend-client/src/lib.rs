//! Storytellers Backend Client — HTTP adapters for the backend services.
//!
//! Each adapter wraps a [`service_client::ServiceClient`] bound to one
//! collaborator and implements the matching trait from
//! `storytellers_core::backend`.

pub mod config;
pub mod error;
pub mod identity;
pub mod narrative;
pub mod prompt_set;
pub mod reaction;
pub mod service_client;

use std::sync::Arc;

use storytellers_core::backend::Backends;
use storytellers_core::outcome::Service;

use crate::config::BackendEndpoints;
use crate::error::ClientError;
use crate::identity::HttpIdentityBackend;
use crate::narrative::HttpNarrativeBackend;
use crate::prompt_set::HttpPromptSetBackend;
use crate::reaction::HttpReactionBackend;
use crate::service_client::ServiceClient;

/// Builds HTTP adapters for all four collaborators.
///
/// # Errors
///
/// Returns `ClientError` if a base URL is invalid or the HTTP client cannot
/// be constructed.
pub fn connect(endpoints: &BackendEndpoints) -> Result<Backends, ClientError> {
    let timeout = endpoints.timeout;
    Ok(Backends {
        identity: Arc::new(HttpIdentityBackend::new(ServiceClient::new(
            Service::Identity,
            &endpoints.users,
            timeout,
        )?)),
        narrative: Arc::new(HttpNarrativeBackend::new(ServiceClient::new(
            Service::Narrative,
            &endpoints.stories,
            timeout,
        )?)),
        prompts: Arc::new(HttpPromptSetBackend::new(ServiceClient::new(
            Service::PromptSet,
            &endpoints.dice,
            timeout,
        )?)),
        reactions: Arc::new(HttpReactionBackend::new(ServiceClient::new(
            Service::Reaction,
            &endpoints.reactions,
            timeout,
        )?)),
    })
}
