//! Domain layer for the authoring workflow.

pub mod commands;
pub mod state;
