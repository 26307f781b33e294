//! Catalog analytics
//!
//! Aggregate counts over a catalog snapshot for dashboard-style summaries.

use crate::core::models::{engagement_for, Category, EngagementMap, Opportunity};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Number of opportunities in one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category
    pub category: Category,
    /// Opportunities in it
    pub count: usize,
}

/// A deadline falling inside the summary window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingDeadline {
    /// Opportunity id
    pub id: i64,
    /// Opportunity title
    pub title: String,
    /// Deadline
    pub deadline: DateTime<Utc>,
    /// Whole days from `now` to the deadline
    pub days_left: i64,
}

/// Aggregate view of a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    /// Catalog size
    pub total: usize,
    /// Counts for every category, in declaration order, zeros included
    pub by_category: Vec<CategoryCount>,
    /// Free or unpriced opportunities
    pub free: usize,
    /// Virtual opportunities
    pub virtual_count: usize,
    /// Transit-accessible opportunities
    pub transit_accessible: usize,
    /// Opportunities offering scholarships
    pub scholarship: usize,
    /// Deadlines between `now` and `now + window`, soonest first
    pub upcoming: Vec<UpcomingDeadline>,
    /// Id of the opportunity with the most comments, if any has comments
    pub most_discussed: Option<i64>,
    /// Id of the opportunity with the most enrollments, if any has enrollments
    pub most_enrolled: Option<i64>,
}

/// First record with the highest non-zero counter; earlier records win ties
fn leader(catalog: &[Opportunity], counter: impl Fn(&Opportunity) -> u32) -> Option<i64> {
    let mut best: Option<(u32, i64)> = None;
    for opp in catalog {
        let value = counter(opp);
        if value > 0 && best.is_none_or(|(top, _)| value > top) {
            best = Some((value, opp.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Summarize `catalog` as of `now`, listing deadlines within `window_days`.
///
/// A window reaching past the representable date range has no upper bound.
#[must_use]
pub fn summarize(
    catalog: &[Opportunity],
    engagement: Option<&EngagementMap>,
    now: DateTime<Utc>,
    window_days: i64,
) -> CatalogSummary {
    let by_category = Category::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            count: catalog.iter().filter(|o| o.category == category).count(),
        })
        .collect();

    let horizon = Duration::try_days(window_days.max(0))
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let mut upcoming: Vec<UpcomingDeadline> = catalog
        .iter()
        .filter_map(|opp| {
            let deadline = opp.deadline?;
            (deadline >= now && deadline <= horizon).then(|| UpcomingDeadline {
                id: opp.id,
                title: opp.title.clone(),
                deadline,
                days_left: (deadline - now).num_days(),
            })
        })
        .collect();
    upcoming.sort_by_key(|u| u.deadline);

    CatalogSummary {
        total: catalog.len(),
        by_category,
        free: catalog.iter().filter(|o| o.is_free_or_unpriced()).count(),
        virtual_count: catalog.iter().filter(|o| o.is_virtual).count(),
        transit_accessible: catalog.iter().filter(|o| o.transit_accessible).count(),
        scholarship: catalog.iter().filter(|o| o.scholarship_available).count(),
        upcoming,
        most_discussed: leader(catalog, |o| engagement_for(engagement, o.id).comments),
        most_enrolled: leader(catalog, |o| engagement_for(engagement, o.id).enrollments),
    }
}
