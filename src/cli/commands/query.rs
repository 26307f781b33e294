//! Query command handler

use crate::args::QueryArgs;
use opportunity_finder::config::Config;
use opportunity_finder::core::catalog::{load_catalog, load_engagement, load_profile};
use opportunity_finder::core::models::{EngagementMap, Opportunity, UserProfile};
use opportunity_finder::core::query::{query, RankedResult};
use opportunity_finder::{debug, error, info, verbose};
use std::path::{Path, PathBuf};

const TITLE_WIDTH: usize = 36;

/// Run the query command.
///
/// # Arguments
/// * `args` - Parsed `query` flags
/// * `config` - Configuration supplying default paths, sort and page size
///
/// # Errors
/// Returns a printable message when an input file cannot be loaded or the
/// engine rejects the query.
pub fn run(args: &QueryArgs, config: &Config) -> Result<(), String> {
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.paths.catalog));
    let catalog = load_catalog(&catalog_path).map_err(|e| {
        error!("Failed to load catalog {}: {e}", catalog_path.display());
        format!("✗ Failed to load {}: {e}", catalog_path.display())
    })?;
    verbose!(
        "✓ Loaded {} opportunities from: {}",
        catalog.len(),
        catalog_path.display()
    );

    let profile = optional_input(args.profile.as_deref(), &config.paths.profile)
        .map(|path| {
            load_profile(&path).map_err(|e| {
                error!("Failed to load profile {}: {e}", path.display());
                format!("✗ Failed to load {}: {e}", path.display())
            })
        })
        .transpose()?;
    let engagement = optional_input(args.engagement.as_deref(), &config.paths.engagement)
        .map(|path| {
            load_engagement(&path).map_err(|e| {
                error!("Failed to load engagement {}: {e}", path.display());
                format!("✗ Failed to load {}: {e}", path.display())
            })
        })
        .transpose()?;

    let spec = args.to_query_spec(config.default_sort(), config.query.page_size);
    debug!("Query: {spec:?}");

    let result = query(&catalog, &spec, profile.as_ref(), engagement.as_ref()).map_err(|e| {
        error!("Query rejected: {e}");
        format!("✗ {e}")
    })?;
    info!(
        "Query returned {} of {} matches",
        result.len(),
        result.total_matches
    );

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("✗ Failed to serialize results: {e}"))?;
        println!("{json}");
    } else {
        print_table(&result, args.offset, profile.as_ref(), engagement.as_ref());
    }
    Ok(())
}

/// An explicit flag path, or the configured default when that file exists
fn optional_input(flag: Option<&Path>, configured: &str) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    let path = PathBuf::from(configured);
    (!configured.is_empty() && path.is_file()).then_some(path)
}

fn print_table(
    result: &RankedResult<'_>,
    offset: usize,
    profile: Option<&UserProfile>,
    engagement: Option<&EngagementMap>,
) {
    if result.is_empty() {
        println!("No opportunities matched ({} total matches).", result.total_matches);
        return;
    }

    let scored = result.entries.iter().any(|e| e.score.is_some());
    println!(
        "{:>5}  {:<TITLE_WIDTH$}  {:<16}  {:<10}  {:>9}{}",
        "ID",
        "TITLE",
        "CATEGORY",
        "DEADLINE",
        "COST",
        if scored { "  SCORE" } else { "" }
    );
    for entry in &result.entries {
        let opp = entry.opportunity;
        let score = entry
            .score
            .map_or_else(String::new, |s| format!("  {s:>5}"));
        println!(
            "{:>5}  {:<TITLE_WIDTH$}  {:<16}  {:<10}  {:>9}{score}",
            opp.id,
            truncate(&opp.title, TITLE_WIDTH),
            opp.category.label(),
            opp.deadline
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            cost_label(opp),
        );
        if scored && !entry.reasons.is_empty() {
            println!("       matched: {}", entry.reasons.join(", "));
        }
    }

    let first = offset + 1;
    let last = offset + result.len();
    println!(
        "\nShowing {first}-{last} of {} matches{}{}",
        result.total_matches,
        if profile.is_some() { " (profile loaded)" } else { "" },
        if engagement.is_some() { " (engagement loaded)" } else { "" },
    );
}

fn cost_label(opp: &Opportunity) -> String {
    match opp.max_cost() {
        None => "-".to_string(),
        Some(max) if max <= 0.0 => "free".to_string(),
        Some(max) => format!("${max:.0}"),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
