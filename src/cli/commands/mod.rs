//! CLI command handlers for `OpportunityFinder`.
//!
//! Each subcommand is implemented in its own submodule.

pub mod config;
pub mod query;
pub mod stats;
