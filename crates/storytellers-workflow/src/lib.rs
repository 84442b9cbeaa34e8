//! Storytellers gateway — story authoring workflow.
//!
//! Drives one session through rolling prompts, composing, and publishing or
//! saving a draft, and re-opens drafts for editing. The only state the
//! gateway keeps between requests lives here.

pub mod application;
pub mod domain;
