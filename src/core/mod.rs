//! Core domain: data model, ingestion, query engine and configuration

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod models;
pub mod query;

/// Returns the current version of the `OpportunityFinder` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
