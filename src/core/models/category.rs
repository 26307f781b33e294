//! Opportunity category

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of opportunity. Unknown names are rejected when a catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Academic or athletic competitions
    #[serde(alias = "competition")]
    Competition,
    /// Paid jobs
    #[serde(alias = "employment")]
    Employment,
    /// Volunteering and community service
    #[serde(alias = "volunteering")]
    Volunteering,
    /// College visits, courses and dual enrollment
    #[serde(alias = "college")]
    College,
    /// School or community clubs
    #[serde(alias = "club")]
    Club,
    /// Honor societies
    #[serde(alias = "honor_society")]
    HonorSociety,
    /// Summer programs and camps
    #[serde(alias = "summer_program")]
    SummerProgram,
    /// SAT/ACT/AP test preparation
    #[serde(alias = "test_prep")]
    TestPrep,
    /// Internships
    #[serde(alias = "internship")]
    Internship,
    /// Anything else
    #[serde(alias = "other")]
    Other,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Competition,
        Self::Employment,
        Self::Volunteering,
        Self::College,
        Self::Club,
        Self::HonorSociety,
        Self::SummerProgram,
        Self::TestPrep,
        Self::Internship,
        Self::Other,
    ];

    /// Human-readable type label, also matched by free-text search.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Competition => "Competition",
            Self::Employment => "Employment",
            Self::Volunteering => "Volunteering",
            Self::College => "College",
            Self::Club => "Club",
            Self::HonorSociety => "Honor Society",
            Self::SummerProgram => "Summer Program",
            Self::TestPrep => "Test Prep",
            Self::Internship => "Internship",
            Self::Other => "Other",
        }
    }

    /// Snake-case name used on the command line and in config files.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Competition => "competition",
            Self::Employment => "employment",
            Self::Volunteering => "volunteering",
            Self::College => "college",
            Self::Club => "club",
            Self::HonorSociety => "honor_society",
            Self::SummerProgram => "summer_program",
            Self::TestPrep => "test_prep",
            Self::Internship => "internship",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the slug, the label, or the variant name, ignoring case, spaces and dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.slug().replace('_', "") == wanted)
            .ok_or_else(|| format!("Unknown category: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_spellings() {
        assert_eq!("honor_society".parse::<Category>(), Ok(Category::HonorSociety));
        assert_eq!("Honor Society".parse::<Category>(), Ok(Category::HonorSociety));
        assert_eq!("HonorSociety".parse::<Category>(), Ok(Category::HonorSociety));
        assert_eq!("test-prep".parse::<Category>(), Ok(Category::TestPrep));
        assert_eq!("COMPETITION".parse::<Category>(), Ok(Category::Competition));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("hackathon".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_rejects_unknown_category() {
        let ok: Category = serde_json::from_str("\"SummerProgram\"").unwrap();
        assert_eq!(ok, Category::SummerProgram);
        let alias: Category = serde_json::from_str("\"summer_program\"").unwrap();
        assert_eq!(alias, Category::SummerProgram);
        assert!(serde_json::from_str::<Category>("\"Hackathon\"").is_err());
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Category::ALL.len());
    }
}
