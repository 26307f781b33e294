//! User profile model

use super::opportunity::GRADE_RANGE;
use serde::{Deserialize, Serialize};

/// How the user can get to in-person opportunities
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transportation {
    /// Has regular access to a car
    pub has_car: bool,
    /// Has a bike
    pub has_bike: bool,
    /// Transit routes the user can ride (e.g., "Bus 12")
    pub transit_routes: Vec<String>,
}

/// The querying user's context
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Current grade (9-12)
    pub grade: Option<u8>,
    /// Unweighted GPA
    pub gpa: Option<f32>,
    /// Age in years
    pub age: Option<u8>,
    /// Interest tags, matched against opportunity tags and descriptions
    pub interests: Vec<String>,
    /// Transportation capabilities
    pub transportation: Option<Transportation>,
    /// Family income bracket, compared against `max_family_income`
    pub income_bracket: Option<u32>,
}

impl UserProfile {
    /// Build a profile from a comma-separated interest list (e.g., `"robotics, debate"`).
    ///
    /// Blank entries are dropped and duplicates removed ignoring case.
    #[must_use]
    pub fn with_interest_list(list: &str) -> Self {
        let mut profile = Self::default();
        for interest in list.split(',') {
            profile.add_interest(interest);
        }
        profile
    }

    /// Add one interest tag unless it is blank or already present (ignoring case)
    pub fn add_interest(&mut self, interest: &str) {
        let interest = interest.trim();
        if interest.is_empty() {
            return;
        }
        let lowered = interest.to_lowercase();
        if !self.interests.iter().any(|i| i.to_lowercase() == lowered) {
            self.interests.push(interest.to_string());
        }
    }

    /// Lowercased, non-blank interests with duplicates removed, in insertion order
    #[must_use]
    pub fn normalized_interests(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::with_capacity(self.interests.len());
        for interest in &self.interests {
            let lowered = interest.trim().to_lowercase();
            if !lowered.is_empty() && !seen.contains(&lowered) {
                seen.push(lowered);
            }
        }
        seen
    }

    /// Check the profile invariants.
    ///
    /// # Errors
    /// Returns a description when the grade is outside 9-12, the GPA is
    /// negative, or an interest contains a comma.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(grade) = self.grade {
            if !GRADE_RANGE.contains(&grade) {
                return Err(format!("grade {grade} is outside 9-12"));
            }
        }
        if self.gpa.is_some_and(|gpa| gpa < 0.0) {
            return Err("gpa is negative".to_string());
        }
        if let Some(bad) = self.interests.iter().find(|i| i.contains(',')) {
            return Err(format!("interest '{bad}' contains a comma"));
        }
        Ok(())
    }
}
