//! Conjunctive filter stages
//!
//! Stages run in a fixed order and a record must pass every active stage.
//! Inactive stages let everything through.

use super::params::QuerySpec;
use crate::core::models::{engagement_for, EngagementMap, Opportunity, UserProfile};

/// Inputs shared by every stage of one query
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Query parameters
    pub spec: &'a QuerySpec,
    /// Lowercased search needle, if searching
    pub needle: Option<&'a str>,
    /// Querying user
    pub profile: Option<&'a UserProfile>,
    /// Engagement counters
    pub engagement: Option<&'a EngagementMap>,
}

/// Category stage
#[must_use]
pub fn category_matches(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    ctx.spec.category.is_none_or(|category| opp.category == category)
}

/// Free-text stage: the needle appears in any searchable field
#[must_use]
pub fn text_matches(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    ctx.needle.is_none_or(|needle| opp.matches_text(needle))
}

/// Cost stage. A record without a maximum cost always passes.
#[must_use]
pub fn cost_within(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    match (ctx.spec.filters.cost_threshold(), opp.max_cost()) {
        (Some(threshold), Some(max)) => max <= threshold,
        _ => true,
    }
}

/// Virtual-only stage
#[must_use]
pub fn virtual_matches(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    !ctx.spec.filters.virtual_only || opp.is_virtual
}

/// Transit-accessible stage
#[must_use]
pub fn transit_matches(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    !ctx.spec.filters.transit_only || opp.transit_accessible
}

/// Scholarship stage
#[must_use]
pub fn scholarship_matches(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    !ctx.spec.filters.scholarship_only || opp.scholarship_available
}

/// Minimum-comment stage; a missing counter is zero
#[must_use]
pub fn enough_comments(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    ctx.spec
        .filters
        .min_comments
        .is_none_or(|min| engagement_for(ctx.engagement, opp.id).comments >= min)
}

/// Minimum-enrollment stage; a missing counter is zero
#[must_use]
pub fn enough_enrollments(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    ctx.spec
        .filters
        .min_enrollments
        .is_none_or(|min| engagement_for(ctx.engagement, opp.id).enrollments >= min)
}

/// Eligibility stage; passes everything when no profile is given
#[must_use]
pub fn eligible(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    if !ctx.spec.filters.eligible_only {
        return true;
    }
    ctx.profile.is_none_or(|profile| opp.is_eligible_for(profile))
}

/// A single filter stage
pub type Stage = fn(&Opportunity, &FilterContext<'_>) -> bool;

/// Every stage, in evaluation order
pub const STAGES: [(&str, Stage); 9] = [
    ("category", category_matches),
    ("search", text_matches),
    ("cost", cost_within),
    ("virtual", virtual_matches),
    ("transit", transit_matches),
    ("scholarship", scholarship_matches),
    ("min_comments", enough_comments),
    ("min_enrollments", enough_enrollments),
    ("eligibility", eligible),
];

/// Whether `opp` passes every stage
#[must_use]
pub fn passes(opp: &Opportunity, ctx: &FilterContext<'_>) -> bool {
    STAGES.iter().all(|(_, stage)| stage(opp, ctx))
}

/// Keep the records that pass every stage, in catalog order
#[must_use]
pub fn apply<'a>(catalog: &'a [Opportunity], ctx: &FilterContext<'_>) -> Vec<&'a Opportunity> {
    catalog.iter().filter(|opp| passes(opp, ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Category, CostRange, Engagement};
    use crate::core::query::params::QueryFilters;
    use chrono::{TimeZone, Utc};

    fn opp(id: i64, category: Category) -> Opportunity {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        Opportunity::new(id, format!("Opportunity {id}"), category, created)
    }

    fn ctx<'a>(spec: &'a QuerySpec, engagement: Option<&'a EngagementMap>) -> FilterContext<'a> {
        FilterContext {
            spec,
            needle: None,
            profile: None,
            engagement,
        }
    }

    #[test]
    fn test_inactive_stages_pass_everything() {
        let spec = QuerySpec::default();
        let record = opp(1, Category::Club);
        for (name, stage) in STAGES {
            assert!(stage(&record, &ctx(&spec, None)), "stage {name} rejected");
        }
    }

    #[test]
    fn test_cost_stage_keeps_unpriced_records() {
        let spec = QuerySpec {
            filters: QueryFilters {
                max_cost: Some(0.0),
                ..QueryFilters::default()
            },
            ..QuerySpec::default()
        };
        let ctx = ctx(&spec, None);

        let unpriced = opp(1, Category::Club);
        assert!(cost_within(&unpriced, &ctx));

        let mut open_ended = opp(2, Category::Club);
        open_ended.cost = Some(CostRange {
            min: Some(40.0),
            max: None,
        });
        assert!(cost_within(&open_ended, &ctx));

        let mut paid = opp(3, Category::Club);
        paid.cost = Some(CostRange::new(0.0, 15.0));
        assert!(!cost_within(&paid, &ctx));

        let mut free = opp(4, Category::Club);
        free.cost = Some(CostRange::free());
        assert!(cost_within(&free, &ctx));
    }

    #[test]
    fn test_engagement_thresholds() {
        let spec = QuerySpec {
            filters: QueryFilters {
                min_comments: Some(2),
                min_enrollments: Some(5),
                ..QueryFilters::default()
            },
            ..QuerySpec::default()
        };
        let mut map = EngagementMap::new();
        map.insert(1, Engagement::new(2, 5));
        map.insert(2, Engagement::new(1, 50));
        let ctx = ctx(&spec, Some(&map));

        assert!(passes(&opp(1, Category::Club), &ctx));
        assert!(!enough_comments(&opp(2, Category::Club), &ctx));
        assert!(enough_enrollments(&opp(2, Category::Club), &ctx));
        assert!(!passes(&opp(3, Category::Club), &ctx));
    }

    #[test]
    fn test_flag_stages() {
        let spec = QuerySpec {
            filters: QueryFilters {
                virtual_only: true,
                transit_only: true,
                scholarship_only: true,
                ..QueryFilters::default()
            },
            ..QuerySpec::default()
        };
        let ctx = ctx(&spec, None);

        let mut record = opp(1, Category::SummerProgram);
        assert!(!virtual_matches(&record, &ctx));
        record.is_virtual = true;
        record.transit_accessible = true;
        assert!(!passes(&record, &ctx));
        record.scholarship_available = true;
        assert!(passes(&record, &ctx));
    }

    #[test]
    fn test_apply_preserves_catalog_order() {
        let spec = QuerySpec {
            category: Some(Category::Competition),
            ..QuerySpec::default()
        };
        let catalog = vec![
            opp(3, Category::Competition),
            opp(1, Category::Club),
            opp(2, Category::Competition),
        ];
        let kept: Vec<i64> = apply(&catalog, &ctx(&spec, None))
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(kept, vec![3, 2]);
    }
}
