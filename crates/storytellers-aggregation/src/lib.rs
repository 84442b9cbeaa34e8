//! Storytellers Gateway — response aggregation.
//!
//! Turns one logical page view into 1..N independent backend calls, runs
//! the independent ones concurrently and merges their outcomes into a
//! single view or a single failure.

pub mod application;
pub mod domain;
