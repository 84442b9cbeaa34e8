//! Fork-join execution of independent sub-requests.

use std::future::Future;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde::Serialize;
use serde_json::Value;
use storytellers_core::error::GatewayError;
use storytellers_core::outcome::CallOutcome;
use tracing::instrument;

use crate::domain::policy::{self, SlotOutcome};
use crate::domain::view::{AggregatedView, Requirement};

/// One named backend call of an aggregate.
pub struct SubRequest<'a> {
    slot: &'static str,
    requirement: Requirement,
    call: BoxFuture<'a, CallOutcome<Value>>,
}

impl std::fmt::Debug for SubRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubRequest")
            .field("slot", &self.slot)
            .field("requirement", &self.requirement)
            .finish_non_exhaustive()
    }
}

impl<'a> SubRequest<'a> {
    /// A sub-request whose failure fails the aggregate.
    pub fn required<T, F>(slot: &'static str, call: F) -> Self
    where
        T: Serialize + Send + 'a,
        F: Future<Output = CallOutcome<T>> + Send + 'a,
    {
        Self::new(slot, Requirement::Required, call)
    }

    /// A sub-request whose failure only leaves an absence marker.
    pub fn optional<T, F>(slot: &'static str, call: F) -> Self
    where
        T: Serialize + Send + 'a,
        F: Future<Output = CallOutcome<T>> + Send + 'a,
    {
        Self::new(slot, Requirement::Optional, call)
    }

    fn new<T, F>(slot: &'static str, requirement: Requirement, call: F) -> Self
    where
        T: Serialize + Send + 'a,
        F: Future<Output = CallOutcome<T>> + Send + 'a,
    {
        Self {
            slot,
            requirement,
            call: async move { to_json(slot, call.await) }.boxed(),
        }
    }
}

fn to_json<T: Serialize>(slot: &'static str, outcome: CallOutcome<T>) -> CallOutcome<Value> {
    match outcome {
        CallOutcome::Success(payload) => match serde_json::to_value(payload) {
            Ok(value) => CallOutcome::Success(value),
            Err(e) => CallOutcome::ApplicationError {
                status: 500,
                description: format!("the {slot} payload could not be encoded: {e}"),
            },
        },
        other => other.map(|_| Value::Null),
    }
}

/// Runs every sub-request concurrently, waits for all of them, then merges
/// in declared order.
///
/// Siblings of a failed required sub-request still run to completion; their
/// results are discarded. Calls with a data dependency belong in a later
/// `gather` whose view is then [`AggregatedView::extend`]ed.
///
/// # Errors
///
/// Returns the error of the first failed required sub-request.
#[instrument(skip_all, fields(sub_requests = requests.len()))]
pub async fn gather(requests: Vec<SubRequest<'_>>) -> Result<AggregatedView, GatewayError> {
    let mut labels = Vec::with_capacity(requests.len());
    let mut calls = Vec::with_capacity(requests.len());
    for request in requests {
        labels.push((request.slot, request.requirement));
        calls.push(request.call);
    }

    let outcomes = join_all(calls).await;

    policy::merge(
        labels
            .into_iter()
            .zip(outcomes)
            .map(|((slot, requirement), outcome)| SlotOutcome {
                slot,
                requirement,
                outcome,
            })
            .collect(),
    )
}
