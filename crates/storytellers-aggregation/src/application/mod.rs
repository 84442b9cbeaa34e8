//! Application layer for the aggregation context.

pub mod aggregator;
pub mod command_handlers;
pub mod query_handlers;
