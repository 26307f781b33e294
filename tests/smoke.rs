//! Integration smoke tests for `opportunity_finder`

use opportunity_finder::core::models::{Category, Opportunity};
use opportunity_finder::{get_version, query, QuerySpec};

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn default_query_runs_end_to_end() {
    let created = chrono::Utc::now();
    let catalog = vec![Opportunity::new(
        1,
        "Youth Orchestra".to_string(),
        Category::Club,
        created,
    )];
    let result = query(&catalog, &QuerySpec::default(), None, None).expect("query should succeed");
    assert_eq!(result.ids(), vec![1]);
}
