//! Command abstractions.

use uuid::Uuid;

/// A state-changing gateway request: a follow, a reaction, a workflow step.
///
/// Handlers record `command_type` and `correlation_id` on their span so a
/// single request can be followed across the backend calls it triggers.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted `context.action` name, e.g. `workflow.roll_prompts`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID assigned when the request arrived.
    fn correlation_id(&self) -> Uuid;
}
