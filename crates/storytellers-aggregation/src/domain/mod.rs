//! Domain layer for the aggregation context.

pub mod commands;
pub mod policy;
pub mod view;
pub mod views;
