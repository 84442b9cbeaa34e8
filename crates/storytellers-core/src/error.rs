//! Gateway error taxonomy.

use thiserror::Error;

use crate::outcome::Service;

/// Failure classes surfaced by the aggregator and the workflow controller.
///
/// Partial degradation of an optional sub-request is deliberately absent:
/// it never aborts a request and is recorded on the aggregated view instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A workflow step was invoked out of order or with invalid input.
    #[error("precondition not met: {0}")]
    PreconditionNotMet(String),

    /// The caller may not act on the entity (e.g. another user's draft).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The entity does not exist. Carries the collaborator's description.
    #[error("{0}")]
    NotFound(String),

    /// A collaborator refused the request. Carries its description verbatim.
    #[error("{0}")]
    ApplicationRejected(String),

    /// The collaborator process did not answer.
    #[error("the {0} service is temporarily unavailable")]
    ServiceUnavailable(Service),
}

impl GatewayError {
    /// Classifies a 4xx answer from a collaborator.
    #[must_use]
    pub fn from_application_error(status: u16, description: String) -> Self {
        if status == 404 {
            Self::NotFound(description)
        } else {
            Self::ApplicationRejected(description)
        }
    }

    /// Machine-readable code used in response bodies and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PreconditionNotMet(_) => "precondition_not_met",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::ApplicationRejected(_) => "application_rejected",
            Self::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}
