//! CLI infrastructure for the `menace` driver
//!
//! Training runs, state-space counts and matchbox inspection. Library errors
//! are wrapped in `anyhow` with context here and nowhere else.

pub mod commands;
pub mod output;
