//! Merge policies.
//!
//! Merging is a pure function of the per-slot outcomes taken in declared
//! order, so the result never depends on which concurrent call finished
//! first.

use serde_json::Value;
use storytellers_core::error::GatewayError;
use storytellers_core::outcome::CallOutcome;
use tracing::warn;

use super::view::{AggregatedView, Degradation, DegradationCause, Requirement, SlotValue};

/// One sub-request's outcome, tagged with its slot.
#[derive(Debug, Clone)]
pub struct SlotOutcome {
    /// Slot name.
    pub slot: &'static str,
    /// Whether failure aborts the aggregate.
    pub requirement: Requirement,
    /// What the collaborator answered.
    pub outcome: CallOutcome<Value>,
}

/// Applies the required/optional policy.
///
/// Successful and empty outcomes fill their slot. A failed optional
/// sub-request leaves an absence marker. A failed required sub-request
/// fails the aggregate; when several fail, the first in declared order is
/// reported and no partial view is returned.
///
/// # Errors
///
/// Returns the error of the first failed required sub-request.
pub fn merge(outcomes: Vec<SlotOutcome>) -> Result<AggregatedView, GatewayError> {
    let mut view = AggregatedView::default();
    let mut failure: Option<GatewayError> = None;

    for SlotOutcome {
        slot,
        requirement,
        outcome,
    } in outcomes
    {
        match (requirement, outcome) {
            (_, CallOutcome::Success(payload)) => view.insert(slot, SlotValue::Present(payload)),
            (_, CallOutcome::EmptySuccess) => view.insert(slot, SlotValue::Empty),
            (Requirement::Required, failed) => {
                if let Err(error) = failed.into_result() {
                    warn!(slot, code = error.code(), %error, "required sub-request failed");
                    if failure.is_none() {
                        failure = Some(error);
                    }
                }
            }
            (Requirement::Optional, CallOutcome::ServiceUnavailable(service)) => {
                warn!(slot, %service, "optional sub-request degraded: service unavailable");
                view.insert(
                    slot,
                    SlotValue::Absent(Degradation {
                        slot,
                        cause: DegradationCause::Unavailable { service },
                    }),
                );
            }
            (
                Requirement::Optional,
                CallOutcome::ApplicationError {
                    status,
                    description,
                },
            ) => {
                warn!(slot, status, %description, "optional sub-request degraded: rejected");
                view.insert(
                    slot,
                    SlotValue::Absent(Degradation {
                        slot,
                        cause: DegradationCause::Rejected {
                            status,
                            description,
                        },
                    }),
                );
            }
        }
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(view),
    }
}

/// Fails an all-optional aggregate only if no slot produced usable data.
///
/// Empty answers count as usable. When every slot is absent the first
/// unavailable collaborator is reported, otherwise the first rejection.
///
/// # Errors
///
/// Returns the chosen degradation as an error when every slot is absent.
pub fn require_any(view: AggregatedView) -> Result<AggregatedView, GatewayError> {
    let degradations = view.degradations();
    let slots = view.slot_names().count();
    let all_absent = slots > 0 && degradations.len() == slots;
    if !all_absent {
        return Ok(view);
    }

    let chosen = degradations
        .iter()
        .find(|d| matches!(d.cause, DegradationCause::Unavailable { .. }))
        .or_else(|| degradations.first());
    match chosen {
        Some(degradation) => Err(degradation.to_error()),
        None => Ok(view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storytellers_core::outcome::Service;

    fn slot(
        slot: &'static str,
        requirement: Requirement,
        outcome: CallOutcome<Value>,
    ) -> SlotOutcome {
        SlotOutcome {
            slot,
            requirement,
            outcome,
        }
    }

    #[test]
    fn test_all_success_fills_every_slot() {
        let view = merge(vec![
            slot("profile", Requirement::Required, CallOutcome::Success(json!({"id": 7}))),
            slot("followers", Requirement::Optional, CallOutcome::Success(json!([]))),
        ])
        .unwrap();

        assert_eq!(view.slot_names().collect::<Vec<_>>(), vec!["profile", "followers"]);
        assert!(view.degradations().is_empty());
    }

    #[test]
    fn test_optional_failure_degrades_without_failing() {
        let view = merge(vec![
            slot("profile", Requirement::Required, CallOutcome::Success(json!({"id": 7}))),
            slot(
                "reaction-stats",
                Requirement::Optional,
                CallOutcome::ServiceUnavailable(Service::Reaction),
            ),
        ])
        .unwrap();

        assert!(view.is_absent("reaction-stats"));
        assert_eq!(view.degradations()[0].slot, "reaction-stats");
    }

    #[test]
    fn test_required_failure_fails_whole_aggregate() {
        let result = merge(vec![
            slot(
                "profile",
                Requirement::Required,
                CallOutcome::ApplicationError {
                    status: 404,
                    description: "User 7 not found".into(),
                },
            ),
            slot("followers", Requirement::Optional, CallOutcome::Success(json!([]))),
        ]);

        assert_eq!(result, Err(GatewayError::NotFound("User 7 not found".into())));
    }

    #[test]
    fn test_required_unavailable_stays_unavailable() {
        let result = merge(vec![slot(
            "profile",
            Requirement::Required,
            CallOutcome::ServiceUnavailable(Service::Identity),
        )]);

        assert_eq!(
            result,
            Err(GatewayError::ServiceUnavailable(Service::Identity))
        );
    }

    #[test]
    fn test_first_declared_required_failure_wins() {
        let result = merge(vec![
            slot(
                "story",
                Requirement::Required,
                CallOutcome::ServiceUnavailable(Service::Narrative),
            ),
            slot(
                "author",
                Requirement::Required,
                CallOutcome::ApplicationError {
                    status: 404,
                    description: "gone".into(),
                },
            ),
        ]);

        assert_eq!(
            result,
            Err(GatewayError::ServiceUnavailable(Service::Narrative))
        );
    }

    #[test]
    fn test_required_empty_success_is_not_failure() {
        let view = merge(vec![slot("stories", Requirement::Required, CallOutcome::EmptySuccess)])
            .unwrap();

        assert_eq!(view.get("stories"), Some(&SlotValue::Empty));
    }

    #[test]
    fn test_require_any_accepts_two_empty_sources() {
        let view = merge(vec![
            slot("users", Requirement::Optional, CallOutcome::EmptySuccess),
            slot("stories", Requirement::Optional, CallOutcome::EmptySuccess),
        ])
        .unwrap();

        assert!(require_any(view).is_ok());
    }

    #[test]
    fn test_require_any_accepts_one_usable_source() {
        let view = merge(vec![
            slot(
                "users",
                Requirement::Optional,
                CallOutcome::ServiceUnavailable(Service::Identity),
            ),
            slot("stories", Requirement::Optional, CallOutcome::Success(json!([]))),
        ])
        .unwrap();

        let view = require_any(view).unwrap();

        assert!(view.is_absent("users"));
    }

    #[test]
    fn test_require_any_fails_when_both_sources_fail() {
        let view = merge(vec![
            slot(
                "users",
                Requirement::Optional,
                CallOutcome::ApplicationError {
                    status: 400,
                    description: "bad query".into(),
                },
            ),
            slot(
                "stories",
                Requirement::Optional,
                CallOutcome::ServiceUnavailable(Service::Narrative),
            ),
        ])
        .unwrap();

        assert_eq!(
            require_any(view),
            Err(GatewayError::ServiceUnavailable(Service::Narrative))
        );
    }
}
