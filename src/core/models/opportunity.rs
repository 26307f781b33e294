//! Opportunity model

use super::{Category, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest high-school grade an eligibility bound may name.
pub const GRADE_RANGE: std::ops::RangeInclusive<u8> = 9..=12;

/// Cost of participating, in whole-currency units. Zero means free.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostRange {
    /// Lowest cost quoted
    #[serde(default)]
    pub min: Option<f64>,
    /// Highest cost quoted
    #[serde(default)]
    pub max: Option<f64>,
}

impl CostRange {
    /// A range with both ends set
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A range that is free at both ends
    #[must_use]
    pub const fn free() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Who may apply. Every bound is optional and absent bounds admit everyone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    /// Lowest eligible grade (9-12)
    pub min_grade: Option<u8>,
    /// Highest eligible grade (9-12)
    pub max_grade: Option<u8>,
    /// Minimum age in years
    pub min_age: Option<u8>,
    /// Maximum age in years
    pub max_age: Option<u8>,
    /// Minimum unweighted GPA
    pub min_gpa: Option<f32>,
    /// Highest family income accepted
    pub max_family_income: Option<u32>,
}

impl Eligibility {
    /// Whether `profile` falls inside every bound it has data for.
    ///
    /// A bound is only checked when the profile carries the matching field,
    /// so an incomplete profile is never excluded for what it does not say.
    #[must_use]
    pub fn admits(&self, profile: &UserProfile) -> bool {
        let grade_ok = profile
            .grade
            .is_none_or(|grade| within(grade, self.min_grade, self.max_grade));
        let age_ok = profile
            .age
            .is_none_or(|age| within(age, self.min_age, self.max_age));
        let gpa_ok = match (profile.gpa, self.min_gpa) {
            (Some(gpa), Some(min)) => gpa >= min,
            _ => true,
        };
        let income_ok = match (profile.income_bracket, self.max_family_income) {
            (Some(income), Some(max)) => income <= max,
            _ => true,
        };
        grade_ok && age_ok && gpa_ok && income_ok
    }
}

fn within<T: PartialOrd + Copy>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|lo| value >= lo) && max.is_none_or(|hi| value <= hi)
}

/// Expected weekly time commitment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoursRange {
    /// Fewest hours per week
    #[serde(default)]
    pub min: Option<f32>,
    /// Most hours per week
    #[serde(default)]
    pub max: Option<f32>,
}

/// A single catalogued extracurricular or admissions opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Unique identifier
    pub id: i64,

    /// Short title (e.g., "Regional Science Olympiad")
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Kind of opportunity
    pub category: Category,

    /// Hosting organization
    #[serde(default)]
    pub organization: Option<String>,

    /// Application or registration deadline
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    /// Participation cost; `None` means the catalog has no cost data
    #[serde(default)]
    pub cost: Option<CostRange>,

    /// Eligibility bounds
    #[serde(default)]
    pub eligibility: Eligibility,

    /// Hours per week
    #[serde(default)]
    pub time_commitment: Option<HoursRange>,

    /// Takes place online
    #[serde(default)]
    pub is_virtual: bool,

    /// Reachable by public transit
    #[serde(default)]
    pub transit_accessible: bool,

    /// Offers scholarships or fee waivers
    #[serde(default)]
    pub scholarship_available: bool,

    /// Needs a car to attend
    #[serde(default)]
    pub requires_car: bool,

    /// Free-text tags (e.g., "robotics", "stem")
    #[serde(default)]
    pub tags: Vec<String>,

    /// Editorial weight, higher ranks first by default
    #[serde(default)]
    pub priority: i32,

    /// When the record entered the catalog
    pub created_at: DateTime<Utc>,
}

impl Opportunity {
    /// Create an opportunity with every optional field empty
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `title` - Title
    /// * `category` - Category
    /// * `created_at` - Creation timestamp
    #[must_use]
    pub const fn new(id: i64, title: String, category: Category, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            category,
            organization: None,
            deadline: None,
            cost: None,
            eligibility: Eligibility {
                min_grade: None,
                max_grade: None,
                min_age: None,
                max_age: None,
                min_gpa: None,
                max_family_income: None,
            },
            time_commitment: None,
            is_virtual: false,
            transit_accessible: false,
            scholarship_available: false,
            requires_car: false,
            tags: Vec::new(),
            priority: 0,
            created_at,
        }
    }

    /// Upper end of the cost range, if the catalog knows it
    #[must_use]
    pub fn max_cost(&self) -> Option<f64> {
        self.cost.and_then(|cost| cost.max)
    }

    /// Free, or no cost data at all
    #[must_use]
    pub fn is_free_or_unpriced(&self) -> bool {
        self.max_cost().is_none_or(|max| max <= 0.0)
    }

    /// Case-insensitive substring match across the searchable fields.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let hit = |haystack: &str| haystack.to_lowercase().contains(needle);
        hit(self.title.as_str())
            || hit(self.description.as_str())
            || self.organization.as_deref().is_some_and(hit)
            || self.tags.iter().any(|tag| hit(tag.as_str()))
            || hit(self.category.label())
    }

    /// Whether `profile` may take part: eligibility bounds plus car access.
    #[must_use]
    pub fn is_eligible_for(&self, profile: &UserProfile) -> bool {
        let transport_ok = !self.requires_car
            || profile
                .transportation
                .as_ref()
                .is_none_or(|transport| transport.has_car);
        transport_ok && self.eligibility.admits(profile)
    }

    /// Check the bound invariants a catalog record must hold.
    ///
    /// # Errors
    /// Returns a description of the first violated bound.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if let Some(cost) = self.cost {
            if cost.min.is_some_and(|v| v < 0.0) || cost.max.is_some_and(|v| v < 0.0) {
                return Err("cost is negative".to_string());
            }
            ordered("cost", cost.min, cost.max)?;
        }
        let bounds = &self.eligibility;
        for grade in [bounds.min_grade, bounds.max_grade].into_iter().flatten() {
            if !GRADE_RANGE.contains(&grade) {
                return Err(format!("grade {grade} is outside 9-12"));
            }
        }
        ordered("grade", bounds.min_grade, bounds.max_grade)?;
        ordered("age", bounds.min_age, bounds.max_age)?;
        if let Some(hours) = self.time_commitment {
            ordered("time commitment", hours.min, hours.max)?;
        }
        Ok(())
    }
}

fn ordered<T: PartialOrd + std::fmt::Display>(
    what: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), String> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(format!("{what} min {lo} exceeds max {hi}")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Transportation;
    use chrono::TimeZone;

    fn sample() -> Opportunity {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut opp = Opportunity::new(
            1,
            "Regional Science Olympiad".to_string(),
            Category::Competition,
            created,
        );
        opp.description = "Team STEM contest with 23 events".to_string();
        opp.organization = Some("Science Olympiad Inc".to_string());
        opp.tags = vec!["Science".to_string(), "Teamwork".to_string()];
        opp
    }

    #[test]
    fn test_matches_text_across_fields() {
        let opp = sample();
        assert!(opp.matches_text("olympiad"));
        assert!(opp.matches_text("stem contest"));
        assert!(opp.matches_text("inc"));
        assert!(opp.matches_text("teamwork"));
        assert!(opp.matches_text("competition"));
        assert!(!opp.matches_text("volunteer"));
    }

    #[test]
    fn test_free_or_unpriced() {
        let mut opp = sample();
        assert!(opp.is_free_or_unpriced());
        opp.cost = Some(CostRange::free());
        assert!(opp.is_free_or_unpriced());
        opp.cost = Some(CostRange::new(0.0, 25.0));
        assert!(!opp.is_free_or_unpriced());
        opp.cost = Some(CostRange {
            min: Some(10.0),
            max: None,
        });
        assert!(opp.is_free_or_unpriced());
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let mut opp = sample();
        assert!(opp.validate().is_ok());

        opp.cost = Some(CostRange::new(100.0, 50.0));
        assert!(opp.validate().unwrap_err().contains("cost"));

        opp.cost = None;
        opp.eligibility.min_grade = Some(11);
        opp.eligibility.max_grade = Some(10);
        assert!(opp.validate().unwrap_err().contains("grade"));

        opp.eligibility.max_grade = Some(13);
        assert!(opp.validate().unwrap_err().contains("outside"));
    }

    #[test]
    fn test_eligibility_ignores_missing_profile_fields() {
        let mut opp = sample();
        opp.eligibility.min_grade = Some(11);
        opp.eligibility.min_gpa = Some(3.5);

        let unknown = UserProfile::default();
        assert!(opp.is_eligible_for(&unknown));

        let junior = UserProfile {
            grade: Some(11),
            gpa: Some(3.8),
            ..UserProfile::default()
        };
        assert!(opp.is_eligible_for(&junior));

        let freshman = UserProfile {
            grade: Some(9),
            ..UserProfile::default()
        };
        assert!(!opp.is_eligible_for(&freshman));

        let low_gpa = UserProfile {
            gpa: Some(3.0),
            ..UserProfile::default()
        };
        assert!(!opp.is_eligible_for(&low_gpa));
    }

    #[test]
    fn test_requires_car() {
        let mut opp = sample();
        opp.requires_car = true;

        let walker = UserProfile {
            transportation: Some(Transportation::default()),
            ..UserProfile::default()
        };
        assert!(!opp.is_eligible_for(&walker));

        let driver = UserProfile {
            transportation: Some(Transportation {
                has_car: true,
                ..Transportation::default()
            }),
            ..UserProfile::default()
        };
        assert!(opp.is_eligible_for(&driver));
    }
}
