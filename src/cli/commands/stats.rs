//! Stats command handler

use opportunity_finder::config::Config;
use opportunity_finder::core::analytics::{summarize, CatalogSummary};
use opportunity_finder::core::catalog::{load_catalog, load_engagement};
use opportunity_finder::error;
use std::path::{Path, PathBuf};

/// Run the stats command.
///
/// # Errors
/// Returns a printable message when an input file cannot be loaded.
pub fn run(
    catalog: Option<&Path>,
    engagement: Option<&Path>,
    window_days: Option<u32>,
    json: bool,
    config: &Config,
) -> Result<(), String> {
    let catalog_path = catalog.map_or_else(|| PathBuf::from(&config.paths.catalog), Path::to_path_buf);
    let opportunities = load_catalog(&catalog_path).map_err(|e| {
        error!("Failed to load catalog {}: {e}", catalog_path.display());
        format!("✗ Failed to load {}: {e}", catalog_path.display())
    })?;

    let engagement = engagement
        .map(|path| {
            load_engagement(path).map_err(|e| {
                error!("Failed to load engagement {}: {e}", path.display());
                format!("✗ Failed to load {}: {e}", path.display())
            })
        })
        .transpose()?;

    let window = window_days.map_or(config.query.deadline_window_days, i64::from);
    let summary = summarize(
        &opportunities,
        engagement.as_ref(),
        chrono::Utc::now(),
        window,
    );

    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("✗ Failed to serialize summary: {e}"))?;
        println!("{text}");
    } else {
        print_summary(&summary, window);
    }
    Ok(())
}

fn print_summary(summary: &CatalogSummary, window: i64) {
    println!("\n=== Catalog Summary ===\n");
    println!("Total opportunities: {}", summary.total);
    println!("  Free or unpriced:   {}", summary.free);
    println!("  Virtual:            {}", summary.virtual_count);
    println!("  Transit accessible: {}", summary.transit_accessible);
    println!("  Scholarships:       {}", summary.scholarship);

    println!("\nBy category:");
    for entry in summary.by_category.iter().filter(|c| c.count > 0) {
        println!("  {:<18} {}", entry.category.label(), entry.count);
    }

    println!("\nDeadlines in the next {window} days:");
    if summary.upcoming.is_empty() {
        println!("  (none)");
    }
    for upcoming in &summary.upcoming {
        println!(
            "  {}  {:>3}d  #{} {}",
            upcoming.deadline.format("%Y-%m-%d"),
            upcoming.days_left,
            upcoming.id,
            upcoming.title
        );
    }

    if let Some(id) = summary.most_discussed {
        println!("\nMost discussed: #{id}");
    }
    if let Some(id) = summary.most_enrolled {
        println!("Most enrolled:  #{id}");
    }
}
