//! Engagement counters supplied by the comment and commitment stores

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Comment and enrollment totals for one opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Engagement {
    /// Number of discussion comments
    pub comments: u32,
    /// Number of students who committed to the opportunity
    pub enrollments: u32,
}

impl Engagement {
    /// Create counters
    #[must_use]
    pub const fn new(comments: u32, enrollments: u32) -> Self {
        Self {
            comments,
            enrollments,
        }
    }
}

/// Engagement counters keyed by opportunity id
pub type EngagementMap = HashMap<i64, Engagement>;

/// Counters for `id`, zero when the map or the entry is missing
#[must_use]
pub fn engagement_for(map: Option<&EngagementMap>, id: i64) -> Engagement {
    map.and_then(|m| m.get(&id)).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entries_count_as_zero() {
        let mut map = EngagementMap::new();
        map.insert(7, Engagement::new(3, 12));

        assert_eq!(engagement_for(Some(&map), 7), Engagement::new(3, 12));
        assert_eq!(engagement_for(Some(&map), 8), Engagement::default());
        assert_eq!(engagement_for(None, 7), Engagement::default());
    }
}
