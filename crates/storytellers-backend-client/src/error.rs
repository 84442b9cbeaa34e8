//! Adapter construction errors.
//!
//! Call failures are never errors here; they are reported as
//! `CallOutcome::ServiceUnavailable` or `CallOutcome::ApplicationError`.

use storytellers_core::outcome::Service;
use thiserror::Error;

/// Errors raised while building an adapter.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL does not parse.
    #[error("invalid base URL {url:?} for the {service} service")]
    InvalidBaseUrl {
        /// The collaborator being configured.
        service: Service,
        /// The rejected URL.
        url: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
