//! Application layer for the authoring workflow.

pub mod command_handlers;
pub mod query_handlers;
pub mod state_store;
