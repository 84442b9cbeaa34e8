//! Query handlers for the authoring workflow.

use serde::Serialize;
use storytellers_core::backend::Backends;
use storytellers_core::error::GatewayError;
use storytellers_core::identity::SessionId;
use storytellers_core::models::PromptSetSummary;
use tracing::instrument;

use crate::application::state_store::WorkflowStateStore;
use crate::domain::state::WorkflowPhase;

/// The prompt-set catalog next to the session's current choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    /// Every prompt set, with its `<id>_<name>` selector.
    pub sets: Vec<PromptSetOption>,
    /// The session's current selector, if any.
    pub selected: Option<String>,
    /// Prompts requested by the last roll.
    pub prompt_count: Option<u32>,
    /// Where the session stands.
    pub phase: WorkflowPhase,
}

/// One entry of the prompt-set catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptSetOption {
    /// The set.
    #[serde(flatten)]
    pub set: PromptSetSummary,
    /// Value to submit when rolling from this set.
    pub selector: String,
}

/// Lists the prompt sets and the session's current selection.
///
/// # Errors
///
/// Returns the PromptSet service's error.
#[instrument(skip(backends, store))]
pub async fn get_settings(
    session: SessionId,
    backends: &Backends,
    store: &dyn WorkflowStateStore,
) -> Result<SettingsView, GatewayError> {
    let sets = backends.prompts.list_sets().await.into_collection()?;
    let state = store.load(session).await?.unwrap_or_default();

    Ok(SettingsView {
        sets: sets
            .into_iter()
            .map(|set| PromptSetOption {
                selector: set.selector(),
                set,
            })
            .collect(),
        selected: state.selector(),
        prompt_count: state.prompt_count,
        phase: state.phase,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, Utc};
    use storytellers_core::outcome::{CallOutcome, Service};
    use storytellers_test_support::{FixedClock, StubBackends, StubPromptSets, prompt_set};

    use super::*;
    use crate::application::state_store::InMemoryWorkflowStore;
    use crate::domain::state::WorkflowState;

    fn memory_store() -> InMemoryWorkflowStore {
        InMemoryWorkflowStore::new(TimeDelta::hours(1), Arc::new(FixedClock(Utc::now())))
    }

    #[tokio::test]
    async fn test_settings_lists_sets_with_current_selection() {
        // Arrange
        let stubs = StubBackends {
            prompts: Arc::new(StubPromptSets {
                sets: CallOutcome::Success(vec![
                    prompt_set("7", "goblins"),
                    prompt_set("8", "elves"),
                ]),
                ..StubPromptSets::default()
            }),
            ..StubBackends::default()
        };
        let store = memory_store();
        let session = SessionId::new();
        let state = WorkflowState::rolled("8_elves".parse().unwrap(), 4, vec!["leaf".into()]);
        store.save(session, state).await.unwrap();

        // Act
        let view = get_settings(session, &stubs.backends(), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(view.sets.len(), 2);
        assert_eq!(view.sets[0].selector, "7_goblins");
        assert_eq!(view.selected.as_deref(), Some("8_elves"));
        assert_eq!(view.prompt_count, Some(4));
        assert_eq!(view.phase, WorkflowPhase::RolledPrompts);
    }

    #[tokio::test]
    async fn test_settings_for_fresh_session_has_no_selection() {
        let stubs = StubBackends::default();
        let store = memory_store();

        let view = get_settings(SessionId::new(), &stubs.backends(), &store)
            .await
            .unwrap();

        assert!(view.sets.is_empty());
        assert_eq!(view.selected, None);
        assert_eq!(view.phase, WorkflowPhase::Idle);
    }

    #[tokio::test]
    async fn test_settings_surfaces_unavailable_catalog() {
        let stubs = StubBackends {
            prompts: Arc::new(StubPromptSets {
                sets: CallOutcome::ServiceUnavailable(Service::PromptSet),
                ..StubPromptSets::default()
            }),
            ..StubBackends::default()
        };

        let result = get_settings(SessionId::new(), &stubs.backends(), &memory_store()).await;

        assert_eq!(
            result,
            Err(GatewayError::ServiceUnavailable(Service::PromptSet))
        );
    }
}
