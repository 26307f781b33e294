//! Opportunity query engine
//!
//! `query` runs a fixed pipeline over an immutable catalog snapshot:
//! filter (conjunctive stages), order (default ordering then the requested
//! sort mode), score (relevance sort only) and paginate. It performs no I/O
//! and keeps no state between calls.

pub mod filter;
pub mod params;
pub mod ranking;

use crate::core::models::{EngagementMap, Opportunity, UserProfile};
use crate::debug;
use serde::Serialize;
use thiserror::Error;

pub use filter::FilterContext;
pub use ranking::{relevance, Relevance};
pub use params::{Page, QueryFilters, QuerySpec, SortMode};

/// Precondition violations detected before any result is produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A required input is missing for the requested sort or filter
    #[error("invalid query input: {0}")]
    InvalidInput(String),
}

/// One ranked opportunity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<'a> {
    /// The matching record
    pub opportunity: &'a Opportunity,
    /// Relevance score, present for `RelevanceToProfile`
    pub score: Option<i64>,
    /// Interests that contributed to the score
    pub reasons: Vec<String>,
}

impl<'a> RankedEntry<'a> {
    const fn unscored(opportunity: &'a Opportunity) -> Self {
        Self {
            opportunity,
            score: None,
            reasons: Vec::new(),
        }
    }
}

/// Ordered, filtered output of one query
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RankedResult<'a> {
    /// Entries in rank order (the requested page only)
    pub entries: Vec<RankedEntry<'a>>,
    /// Number of matches before pagination
    pub total_matches: usize,
}

impl<'a> RankedResult<'a> {
    /// Number of entries returned
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were returned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of the returned entries, in order
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.opportunity.id).collect()
    }

    /// The returned records, in order
    pub fn opportunities(&self) -> impl Iterator<Item = &'a Opportunity> + '_ {
        self.entries.iter().map(|e| e.opportunity)
    }
}

fn check_preconditions(
    spec: &QuerySpec,
    profile: Option<&UserProfile>,
    engagement: Option<&EngagementMap>,
) -> Result<(), QueryError> {
    if profile.is_none() {
        if spec.sort == SortMode::RelevanceToProfile {
            return Err(QueryError::InvalidInput(
                "sorting by relevance requires a user profile".to_string(),
            ));
        }
        if spec.filters.eligible_only {
            return Err(QueryError::InvalidInput(
                "the eligibility filter requires a user profile".to_string(),
            ));
        }
    }
    if let Some(max) = spec.filters.max_cost {
        if !max.is_finite() || max < 0.0 {
            return Err(QueryError::InvalidInput(format!(
                "maximum cost must be a non-negative amount, got {max}"
            )));
        }
    }
    if engagement.is_none() && spec.filters.needs_engagement() {
        return Err(QueryError::InvalidInput(
            "comment or enrollment thresholds require engagement counters".to_string(),
        ));
    }
    Ok(())
}

/// Filter, rank and paginate `catalog` according to `spec`.
///
/// # Arguments
/// * `catalog` - Catalog snapshot; order only matters for ties
/// * `spec` - Query parameters
/// * `profile` - Querying user; required for relevance sort and eligibility filtering
/// * `engagement` - Comment/enrollment counters; required for threshold filters,
///   treated as all-zero when absent for popularity sorts
///
/// # Errors
/// Returns [`QueryError::InvalidInput`] when a required profile or engagement
/// map is missing, or the maximum cost is negative or not finite. Empty catalogs and empty results are not errors.
pub fn query<'a>(
    catalog: &'a [Opportunity],
    spec: &QuerySpec,
    profile: Option<&UserProfile>,
    engagement: Option<&EngagementMap>,
) -> Result<RankedResult<'a>, QueryError> {
    check_preconditions(spec, profile, engagement)?;

    let needle = spec.search_needle();
    let ctx = FilterContext {
        spec,
        needle: needle.as_deref(),
        profile,
        engagement,
    };

    let mut matches = filter::apply(catalog, &ctx);
    debug!(
        "query matched {} of {} opportunities (sort={})",
        matches.len(),
        catalog.len(),
        spec.sort
    );

    ranking::sort_default(&mut matches);

    let mut entries: Vec<RankedEntry<'a>> = if spec.sort == SortMode::RelevanceToProfile {
        let interests = profile.map(UserProfile::normalized_interests).unwrap_or_default();
        let mut scored: Vec<RankedEntry<'a>> = matches
            .into_iter()
            .map(|opp| {
                let Relevance { score, reasons } = relevance(opp, &interests);
                RankedEntry {
                    opportunity: opp,
                    score: Some(score),
                    reasons,
                }
            })
            .collect();
        scored.sort_by_key(|entry| std::cmp::Reverse(entry.score));
        scored
    } else {
        ranking::sort_by_mode(&mut matches, spec.sort, engagement);
        matches.into_iter().map(RankedEntry::unscored).collect()
    };

    let total_matches = entries.len();
    if let Some(page) = spec.page {
        entries = entries
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();
    }

    Ok(RankedResult {
        entries,
        total_matches,
    })
}
