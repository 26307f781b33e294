//! Catalog, profile and engagement ingestion
//!
//! Catalog files are either a JSON array of opportunities or a TOML document
//! with one `[[opportunity]]` table per record. Timestamps are RFC 3339
//! strings in both formats. Every record is validated here, so the query
//! engine never sees an unknown category or an inverted bound.

use crate::core::models::{EngagementMap, Opportunity, UserProfile};
use crate::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while loading input files
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Malformed JSON, including unknown categories
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed TOML, including unknown categories
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// File extension is neither `.json` nor `.toml`
    #[error("unsupported catalog format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),
    /// A record breaks a bound invariant
    #[error("opportunity {id} is invalid: {reason}")]
    InvalidRecord {
        /// Offending record id
        id: i64,
        /// What is wrong with it
        reason: String,
    },
    /// Two records share an id
    #[error("duplicate opportunity id {0}")]
    DuplicateId(i64),
    /// The user profile breaks an invariant
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default, rename = "opportunity")]
    opportunities: Vec<Opportunity>,
}

fn read(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Check every record and reject duplicate ids.
///
/// # Errors
/// Returns the first invalid record or duplicate id found, in catalog order.
pub fn validate_catalog(catalog: &[Opportunity]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(catalog.len());
    for opp in catalog {
        opp.validate()
            .map_err(|reason| CatalogError::InvalidRecord { id: opp.id, reason })?;
        if !seen.insert(opp.id) {
            return Err(CatalogError::DuplicateId(opp.id));
        }
    }
    Ok(())
}

/// Parse and validate a JSON catalog.
///
/// # Errors
/// Returns an error on malformed JSON, unknown categories or invalid records.
pub fn parse_catalog_json(text: &str) -> Result<Vec<Opportunity>, CatalogError> {
    let catalog: Vec<Opportunity> = serde_json::from_str(text)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse and validate a TOML catalog.
///
/// # Errors
/// Returns an error on malformed TOML, unknown categories or invalid records.
pub fn parse_catalog_toml(text: &str) -> Result<Vec<Opportunity>, CatalogError> {
    let catalog = toml::from_str::<TomlCatalog>(text)?.opportunities;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Load a catalog file, picking the format from its extension.
///
/// # Errors
/// Returns an error if the file cannot be read, has an unknown extension,
/// or fails parsing or validation.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Opportunity>, CatalogError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let catalog = match extension.as_str() {
        "json" => parse_catalog_json(&read(path)?)?,
        "toml" => parse_catalog_toml(&read(path)?)?,
        _ => return Err(CatalogError::UnsupportedFormat(path.display().to_string())),
    };
    info!(
        "Loaded {} opportunities from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Load and validate a JSON user profile.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or the profile is invalid.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<UserProfile, CatalogError> {
    let profile: UserProfile = serde_json::from_str(&read(path.as_ref())?)?;
    profile.validate().map_err(CatalogError::InvalidProfile)?;
    debug!(
        "Loaded profile with {} interests from {}",
        profile.interests.len(),
        path.as_ref().display()
    );
    Ok(profile)
}

/// Load engagement counters from a JSON object keyed by opportunity id.
///
/// ```json
/// { "1": { "comments": 4, "enrollments": 12 }, "2": { "enrollments": 3 } }
/// ```
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_engagement<P: AsRef<Path>>(path: P) -> Result<EngagementMap, CatalogError> {
    let map: EngagementMap = serde_json::from_str(&read(path.as_ref())?)?;
    debug!(
        "Loaded engagement for {} opportunities from {}",
        map.len(),
        path.as_ref().display()
    );
    Ok(map)
}

/// Catalog file loaded at most once per store.
///
/// The first successful [`snapshot`](Self::snapshot) caches the catalog;
/// a failed load is not cached, so the next call retries.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    catalog: OnceLock<Vec<Opportunity>>,
}

impl CatalogStore {
    /// Create a store for the catalog at `path` without reading it
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            catalog: OnceLock::new(),
        }
    }

    /// Path the store reads from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the catalog has been loaded
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    /// The cached catalog, loading it on first use.
    ///
    /// # Errors
    /// Returns the load error when the catalog has not been cached yet and
    /// cannot be read.
    pub fn snapshot(&self) -> Result<&[Opportunity], CatalogError> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }
        let loaded = load_catalog(&self.path)?;
        Ok(self.catalog.get_or_init(|| loaded))
    }
}
