//! Shared application state.

use std::sync::Arc;

use storytellers_core::backend::Backends;
use storytellers_workflow::application::state_store::WorkflowStateStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Adapters for the four collaborators.
    pub backends: Backends,
    /// Per-session authoring state.
    pub workflow_store: Arc<dyn WorkflowStateStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(backends: Backends, workflow_store: Arc<dyn WorkflowStateStore>) -> Self {
        Self {
            backends,
            workflow_store,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backends", &self.backends)
            .finish_non_exhaustive()
    }
}
