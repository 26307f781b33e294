//! Integration tests for catalog, profile and engagement loading

use opportunity_finder::core::catalog::{
    load_catalog, load_engagement, load_profile, CatalogError, CatalogStore,
};
use opportunity_finder::core::models::Category;
use opportunity_finder::{query, QuerySpec, SortMode};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG_JSON: &str = r#"[
  {
    "id": 10,
    "title": "Math League",
    "category": "Competition",
    "cost": { "min": 0, "max": 0 },
    "deadline": "2025-11-01T00:00:00Z",
    "tags": ["math"],
    "created_at": "2025-08-01T00:00:00Z"
  },
  {
    "id": 11,
    "title": "Food Bank Shifts",
    "description": "Volunteer at the downtown food bank",
    "category": "Volunteering",
    "organization": "City Food Bank",
    "transit_accessible": true,
    "created_at": "2025-08-03T00:00:00Z"
  },
  {
    "id": 12,
    "title": "Robotics Challenge",
    "category": "competition",
    "cost": { "min": 100, "max": 500 },
    "deadline": "2025-10-20T00:00:00Z",
    "eligibility": { "min_grade": 9, "max_grade": 12 },
    "created_at": "2025-08-02T00:00:00Z"
  }
]"#;

const CATALOG_TOML: &str = r#"
[[opportunity]]
id = 1
title = "Teen Library Council"
category = "club"
is_virtual = true
created_at = "2025-06-01T00:00:00Z"

[[opportunity]]
id = 2
title = "Museum Internship"
category = "Internship"
deadline = "2025-12-01T00:00:00Z"
scholarship_available = true
created_at = "2025-06-02T00:00:00Z"
[opportunity.time_commitment]
min = 4.0
max = 8.0
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

#[test]
fn test_load_json_catalog_and_query() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "catalog.json", CATALOG_JSON);

    let catalog = load_catalog(&path).expect("Failed to load catalog");
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog[1].organization.as_deref(), Some("City Food Bank"));

    let spec = QuerySpec {
        category: Some(Category::Competition),
        sort: SortMode::DeadlineSoonest,
        ..QuerySpec::default()
    };
    let result = query(&catalog, &spec, None, None).unwrap();
    assert_eq!(result.ids(), vec![12, 10]);
}

#[test]
fn test_load_toml_catalog() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "catalog.toml", CATALOG_TOML);

    let catalog = load_catalog(&path).expect("Failed to load catalog");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].category, Category::Club);
    assert!(catalog[0].is_virtual);
    assert!(catalog[1].deadline.is_some());
    assert_eq!(catalog[1].time_commitment.and_then(|h| h.max), Some(8.0));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "catalog.csv", "id,title\n1,x\n");
    assert!(matches!(
        load_catalog(&path),
        Err(CatalogError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = load_catalog(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_grade_outside_range_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(
        &dir,
        "bad.json",
        r#"[{"id": 1, "title": "Senior Seminar", "category": "Club",
             "eligibility": {"min_grade": 13},
             "created_at": "2025-08-01T00:00:00Z"}]"#,
    );
    assert!(matches!(
        load_catalog(&path),
        Err(CatalogError::InvalidRecord { id: 1, .. })
    ));
}

#[test]
fn test_load_profile() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(
        &dir,
        "profile.json",
        r#"{"grade": 11, "gpa": 3.6, "interests": ["Robotics", "debate"],
            "transportation": {"has_car": false, "transit_routes": ["Bus 12"]}}"#,
    );
    let profile = load_profile(&path).expect("Failed to load profile");
    assert_eq!(profile.grade, Some(11));
    assert_eq!(profile.normalized_interests(), vec!["robotics", "debate"]);
    assert!(!profile.transportation.unwrap().has_car);
}

#[test]
fn test_profile_with_grade_13_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "profile.json", r#"{"grade": 13}"#);
    assert!(matches!(
        load_profile(&path),
        Err(CatalogError::InvalidProfile(_))
    ));
}

#[test]
fn test_load_engagement_and_sort() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let catalog_path = write(&dir, "catalog.json", CATALOG_JSON);
    let engagement_path = write(
        &dir,
        "engagement.json",
        r#"{"10": {"comments": 2, "enrollments": 1}, "11": {"enrollments": 40}}"#,
    );

    let catalog = load_catalog(&catalog_path).unwrap();
    let engagement = load_engagement(&engagement_path).expect("Failed to load engagement");
    assert_eq!(engagement.len(), 2);
    assert_eq!(engagement[&11].comments, 0);

    let result = query(&catalog, &QuerySpec::default(), None, Some(&engagement)).unwrap();
    assert_eq!(result.ids()[0], 11);
}

#[test]
fn test_catalog_store_loads_once() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "catalog.json", CATALOG_JSON);
    let store = CatalogStore::new(&path);
    assert!(!store.is_loaded());
    assert_eq!(store.path(), path.as_path());

    let first = store.snapshot().expect("Failed to load snapshot").len();
    assert!(store.is_loaded());

    // The cached snapshot survives the file changing underneath it
    fs::write(&path, "[]").unwrap();
    let second = store.snapshot().unwrap().len();
    assert_eq!(first, second);
}

#[test]
fn test_catalog_store_retries_after_failure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("late.json");
    let store = CatalogStore::new(&path);

    assert!(store.snapshot().is_err());
    assert!(!store.is_loaded());

    fs::write(&path, CATALOG_JSON).unwrap();
    assert_eq!(store.snapshot().unwrap().len(), 3);
}
