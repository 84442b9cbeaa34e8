//! Storytellers Core — shared gateway abstractions.
//!
//! This crate defines the types every other crate speaks: the tagged
//! outcome of a backend call, the gateway error taxonomy, caller identity,
//! user-facing notices, the backend adapter traits and the prompt-trace
//! wire codec. It contains no transport code.

pub mod backend;
pub mod clock;
pub mod command;
pub mod error;
pub mod identity;
pub mod models;
pub mod notice;
pub mod outcome;
pub mod trace;
