//! Query parameters

use crate::core::models::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most enrolled first
    #[default]
    Popular,
    /// Most commented first
    MostDiscussed,
    /// Earliest deadline first, undated last
    DeadlineSoonest,
    /// Most recently created first
    Newest,
    /// Highest interest-match score first
    RelevanceToProfile,
}

impl SortMode {
    /// Every sort mode in declaration order
    pub const ALL: [Self; 5] = [
        Self::Popular,
        Self::MostDiscussed,
        Self::DeadlineSoonest,
        Self::Newest,
        Self::RelevanceToProfile,
    ];

    /// Name used on the command line and in config files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::MostDiscussed => "most_discussed",
            Self::DeadlineSoonest => "deadline_soonest",
            Self::Newest => "newest",
            Self::RelevanceToProfile => "relevance",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "popular" => Ok(Self::Popular),
            "most_discussed" | "discussed" => Ok(Self::MostDiscussed),
            "deadline_soonest" | "deadline" => Ok(Self::DeadlineSoonest),
            "newest" => Ok(Self::Newest),
            "relevance" | "relevance_to_profile" => Ok(Self::RelevanceToProfile),
            _ => Err(format!(
                "Unknown sort mode: '{s}' (expected one of: {})",
                Self::ALL.map(Self::as_str).join(", ")
            )),
        }
    }
}

/// Structured filters; every inactive filter lets all records through
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilters {
    /// Keep records whose maximum cost is at most this amount (or unknown)
    pub max_cost: Option<f64>,
    /// Keep free records (or unknown cost); same as `max_cost = 0`
    pub free_only: bool,
    /// Keep transit-accessible records
    pub transit_only: bool,
    /// Keep virtual records
    pub virtual_only: bool,
    /// Keep records that offer scholarships
    pub scholarship_only: bool,
    /// Keep records with at least this many comments
    pub min_comments: Option<u32>,
    /// Keep records with at least this many enrollments
    pub min_enrollments: Option<u32>,
    /// Keep records the profile is eligible for
    pub eligible_only: bool,
}

impl QueryFilters {
    /// Effective cost ceiling; the lower of `max_cost` and the free-only ceiling
    #[must_use]
    pub fn cost_threshold(&self) -> Option<f64> {
        let free = self.free_only.then_some(0.0);
        match (self.max_cost, free) {
            (Some(max), Some(zero)) => Some(max.min(zero)),
            (max, zero) => max.or(zero),
        }
    }

    /// Whether any filter needs engagement counters
    #[must_use]
    pub const fn needs_engagement(&self) -> bool {
        self.min_comments.is_some() || self.min_enrollments.is_some()
    }
}

/// A window into the sorted result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Entries to skip
    pub offset: usize,
    /// Entries to keep
    pub limit: usize,
}

impl Page {
    /// First page of `limit` entries
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }
}

/// Parameters of one query. Built fresh per query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySpec {
    /// Free-text search; empty matches everything
    pub search: String,
    /// Category to keep
    pub category: Option<Category>,
    /// Structured filters
    pub filters: QueryFilters,
    /// Ordering
    pub sort: SortMode,
    /// Optional pagination window
    pub page: Option<Page>,
}

impl QuerySpec {
    /// Unfiltered query with the given ordering
    #[must_use]
    pub fn sorted_by(sort: SortMode) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Lowercased search needle, `None` when the search is empty.
    ///
    /// The text is not trimmed: `" art"` only matches where a space precedes "art".
    #[must_use]
    pub fn search_needle(&self) -> Option<String> {
        (!self.search.is_empty()).then(|| self.search.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_round_trips_names() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
        assert_eq!("Deadline".parse::<SortMode>(), Ok(SortMode::DeadlineSoonest));
        assert_eq!(
            "most-discussed".parse::<SortMode>(),
            Ok(SortMode::MostDiscussed)
        );
        assert!("cheapest".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_cost_threshold() {
        let mut filters = QueryFilters::default();
        assert_eq!(filters.cost_threshold(), None);

        filters.max_cost = Some(200.0);
        assert_eq!(filters.cost_threshold(), Some(200.0));

        filters.free_only = true;
        assert_eq!(filters.cost_threshold(), Some(0.0));

        filters.max_cost = None;
        assert_eq!(filters.cost_threshold(), Some(0.0));
    }

    #[test]
    fn test_search_needle() {
        let mut spec = QuerySpec::default();
        assert_eq!(spec.search_needle(), None);
        spec.search = "Robotics".to_string();
        assert_eq!(spec.search_needle(), Some("robotics".to_string()));
        spec.search = " Art".to_string();
        assert_eq!(spec.search_needle(), Some(" art".to_string()));
    }

    #[test]
    fn test_default_spec_is_popular() {
        let spec = QuerySpec::default();
        assert_eq!(spec.sort, SortMode::Popular);
        assert!(!spec.filters.needs_engagement());
    }
}
