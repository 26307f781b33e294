//! Shared library for `OpportunityFinder`
//!
//! Filters, scores and sorts a catalog of student opportunities (clubs,
//! competitions, internships and the like) against a query and an optional
//! user profile. The `oppfinder` binary is a thin CLI over this library.

pub mod core;
pub mod logger;

pub use crate::core::config;
pub use crate::core::get_version;
pub use crate::core::query::{query, QueryError, QuerySpec, RankedResult, SortMode};
