//! Ordering and relevance scoring

use super::params::SortMode;
use crate::core::models::{engagement_for, EngagementMap, Opportunity};
use std::cmp::{Ordering, Reverse};

/// Score for each profile interest found in the opportunity's tags
pub const TAG_MATCH_WEIGHT: i64 = 10;

/// Score for each profile interest found in the description
pub const DESCRIPTION_MATCH_WEIGHT: i64 = 5;

/// Relevance of one opportunity to a set of interests
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relevance {
    /// Priority plus weighted interest hits
    pub score: i64,
    /// Which interests contributed, as `tag:<interest>` / `description:<interest>`
    pub reasons: Vec<String>,
}

/// Score `opp` against lowercased `interests`.
///
/// An interest counts once for the tags when it is a substring of any tag,
/// and once more for the description when it is a substring of it, so an
/// interest present in both places scores both weights.
#[must_use]
pub fn relevance(opp: &Opportunity, interests: &[String]) -> Relevance {
    let description = opp.description.to_lowercase();
    let tags: Vec<String> = opp.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut relevance = Relevance {
        score: i64::from(opp.priority),
        reasons: Vec::new(),
    };
    for interest in interests {
        if tags.iter().any(|tag| tag.contains(interest.as_str())) {
            relevance.score += TAG_MATCH_WEIGHT;
            relevance.reasons.push(format!("tag:{interest}"));
        }
        if description.contains(interest.as_str()) {
            relevance.score += DESCRIPTION_MATCH_WEIGHT;
            relevance.reasons.push(format!("description:{interest}"));
        }
    }
    relevance
}

/// Deadline ordering with undated records last
fn deadline_cmp(a: &Opportunity, b: &Opportunity) -> Ordering {
    match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Baseline ordering: priority descending, then deadline ascending (undated last)
#[must_use]
pub fn default_cmp(a: &Opportunity, b: &Opportunity) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| deadline_cmp(a, b))
}

/// Put `matches` in default order. Stable, so equal records keep catalog order.
pub fn sort_default(matches: &mut [&Opportunity]) {
    matches.sort_by(|a, b| default_cmp(a, b));
}

/// Apply `mode` as a stable sort on top of the current order.
///
/// `RelevanceToProfile` is handled by the caller because it needs the scores.
pub fn sort_by_mode(matches: &mut [&Opportunity], mode: SortMode, engagement: Option<&EngagementMap>) {
    match mode {
        SortMode::Popular => {
            matches.sort_by_key(|opp| Reverse(engagement_for(engagement, opp.id).enrollments));
        }
        SortMode::MostDiscussed => {
            matches.sort_by_key(|opp| Reverse(engagement_for(engagement, opp.id).comments));
        }
        SortMode::DeadlineSoonest => matches.sort_by(|a, b| deadline_cmp(a, b)),
        SortMode::Newest => matches.sort_by_key(|opp| Reverse(opp.created_at)),
        SortMode::RelevanceToProfile => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Category, Engagement};
    use chrono::{Duration, TimeZone, Utc};

    fn opp(id: i64, priority: i32, deadline_days: Option<i64>) -> Opportunity {
        let base = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let mut o = Opportunity::new(id, format!("Opp {id}"), Category::Club, base);
        o.priority = priority;
        o.deadline = deadline_days.map(|d| base + Duration::days(d));
        o
    }

    fn ids(list: &[&Opportunity]) -> Vec<i64> {
        list.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_relevance_counts_tags_and_description() {
        let mut o = opp(1, 3, None);
        o.tags = vec!["Robotics Club".to_string(), "STEM".to_string()];
        o.description = "Build robots and learn robotics with mentors".to_string();

        let interests = vec!["robotics".to_string(), "stem".to_string(), "art".to_string()];
        let rel = relevance(&o, &interests);

        // robotics: tag + description, stem: tag only
        assert_eq!(rel.score, 3 + 10 + 5 + 10);
        assert_eq!(
            rel.reasons,
            vec!["tag:robotics", "description:robotics", "tag:stem"]
        );
    }

    #[test]
    fn test_relevance_without_interests_is_priority() {
        let o = opp(1, 7, None);
        assert_eq!(relevance(&o, &[]).score, 7);
        assert!(relevance(&o, &[]).reasons.is_empty());
    }

    #[test]
    fn test_default_order_priority_then_deadline() {
        let a = opp(1, 1, None);
        let b = opp(2, 5, Some(30));
        let c = opp(3, 5, Some(10));
        let d = opp(4, 1, Some(3));
        let mut list = vec![&a, &b, &c, &d];
        sort_default(&mut list);
        assert_eq!(ids(&list), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_deadline_soonest_puts_undated_last() {
        let a = opp(1, 9, None);
        let b = opp(2, 0, Some(20));
        let c = opp(3, 0, Some(2));
        let mut list = vec![&a, &b, &c];
        sort_by_mode(&mut list, SortMode::DeadlineSoonest, None);
        assert_eq!(ids(&list), vec![3, 2, 1]);
    }

    #[test]
    fn test_popular_and_discussed_use_engagement() {
        let a = opp(1, 0, None);
        let b = opp(2, 0, None);
        let c = opp(3, 0, None);
        let mut map = EngagementMap::new();
        map.insert(1, Engagement::new(9, 1));
        map.insert(2, Engagement::new(0, 4));

        let mut list = vec![&a, &b, &c];
        sort_by_mode(&mut list, SortMode::Popular, Some(&map));
        assert_eq!(ids(&list), vec![2, 1, 3]);

        let mut list = vec![&a, &b, &c];
        sort_by_mode(&mut list, SortMode::MostDiscussed, Some(&map));
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_newest_first() {
        let mut a = opp(1, 0, None);
        let b = opp(2, 0, None);
        a.created_at += Duration::days(1);
        let mut list = vec![&b, &a];
        sort_by_mode(&mut list, SortMode::Newest, None);
        assert_eq!(ids(&list), vec![1, 2]);
    }
}
