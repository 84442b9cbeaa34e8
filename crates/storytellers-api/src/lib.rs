//! Storytellers API — the front door for the Storytellers services.
//!
//! Exposes the router and its building blocks so the binary and the
//! integration tests assemble the same application.

pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;
