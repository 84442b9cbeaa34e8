//! Tagged outcome of a single backend call.
//!
//! Every adapter operation returns a `CallOutcome`. Callers match on it
//! explicitly instead of inspecting status-code ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// The backend collaborators the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Users, credentials and follower relationships.
    Identity,
    /// Stories and drafts.
    Narrative,
    /// Prompt catalogs and rolls (the dice service).
    PromptSet,
    /// Likes and dislikes.
    Reaction,
}

impl Service {
    /// Short name used in logs and user-facing messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "users",
            Self::Narrative => "stories",
            Self::PromptSet => "dice",
            Self::Reaction => "reactions",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    /// 2xx with a decoded payload.
    Success(T),
    /// 204: the collaborator answered and there is nothing to return.
    EmptySuccess,
    /// 4xx carrying the collaborator's own description.
    ApplicationError {
        /// HTTP status the collaborator answered with.
        status: u16,
        /// Human-readable description from the `{description}` payload.
        description: String,
    },
    /// The collaborator did not answer: 5xx, transport failure or timeout.
    ServiceUnavailable(Service),
}

impl<T> CallOutcome<T> {
    /// Returns `true` for `Success` and `EmptySuccess`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_) | Self::EmptySuccess)
    }

    /// Maps the success payload, leaving every other variant untouched.
    pub fn map<U, F>(self, f: F) -> CallOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => CallOutcome::Success(f(value)),
            Self::EmptySuccess => CallOutcome::EmptySuccess,
            Self::ApplicationError {
                status,
                description,
            } => CallOutcome::ApplicationError {
                status,
                description,
            },
            Self::ServiceUnavailable(service) => CallOutcome::ServiceUnavailable(service),
        }
    }

    /// Converts the outcome of a call whose payload the caller cannot do
    /// without. `EmptySuccess` becomes `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the `GatewayError` matching the failure class; the
    /// collaborator's description is preserved verbatim.
    pub fn into_result(self) -> Result<Option<T>, GatewayError> {
        match self {
            Self::Success(value) => Ok(Some(value)),
            Self::EmptySuccess => Ok(None),
            Self::ApplicationError {
                status,
                description,
            } => Err(GatewayError::from_application_error(status, description)),
            Self::ServiceUnavailable(service) => Err(GatewayError::ServiceUnavailable(service)),
        }
    }

    /// Like [`CallOutcome::into_result`], but treats `EmptySuccess` as the
    /// given "nothing there" error.
    ///
    /// # Errors
    ///
    /// Returns `missing` on `EmptySuccess`, otherwise as `into_result`.
    pub fn into_present(self, missing: GatewayError) -> Result<T, GatewayError> {
        self.into_result()?.ok_or(missing)
    }
}

impl<T: Default> CallOutcome<T> {
    /// Converts the outcome of a collection call where "nothing" is a
    /// legitimate answer: `EmptySuccess` becomes `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns the `GatewayError` matching the failure class.
    pub fn into_collection(self) -> Result<T, GatewayError> {
        Ok(self.into_result()?.unwrap_or_default())
    }
}
