//! CLI argument definitions for `OpportunityFinder`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use opportunity_finder::config::ConfigOverrides;
use opportunity_finder::core::models::Category;
use opportunity_finder::core::query::{Page, QueryFilters, QuerySpec, SortMode};
use opportunity_finder::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog`, `page_size`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Parse a cost ceiling: a finite, non-negative amount
fn parse_cost(value: &str) -> Result<f64, String> {
    let amount: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(format!("cost must be a non-negative amount, got '{value}'"))
    }
}

/// Arguments of the `query` subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Catalog file (.json or .toml); defaults to config `catalog`
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// User profile JSON, needed for `--sort relevance` and `--eligible-only`
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Engagement counters JSON, needed for `--min-comments` / `--min-enrollments`
    #[arg(long, value_name = "FILE")]
    pub engagement: Option<PathBuf>,

    /// Case-insensitive text searched in title, description, organization,
    /// tags and category label
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    pub search: String,

    /// Only this category (e.g. `competition`, `honor_society`)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Maximum cost; unpriced opportunities always pass
    #[arg(long, value_name = "AMOUNT", value_parser = parse_cost)]
    pub max_cost: Option<f64>,

    /// Only free or unpriced opportunities
    #[arg(long)]
    pub free_only: bool,

    /// Only virtual opportunities
    #[arg(long)]
    pub virtual_only: bool,

    /// Only transit-accessible opportunities
    #[arg(long)]
    pub transit_only: bool,

    /// Only opportunities offering scholarships
    #[arg(long)]
    pub scholarship_only: bool,

    /// Minimum number of comments
    #[arg(long, value_name = "N")]
    pub min_comments: Option<u32>,

    /// Minimum number of enrollments
    #[arg(long, value_name = "N")]
    pub min_enrollments: Option<u32>,

    /// Only opportunities the profile is eligible for
    #[arg(long)]
    pub eligible_only: bool,

    /// Sort mode (popular, most_discussed, deadline_soonest, newest, relevance);
    /// defaults to config `default_sort`
    #[arg(long, value_name = "MODE")]
    pub sort: Option<SortMode>,

    /// Skip this many results
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub offset: usize,

    /// Results per page; defaults to config `page_size`, 0 shows everything
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// Build the engine query, filling omitted sort and limit from config defaults
    pub fn to_query_spec(&self, default_sort: SortMode, default_limit: usize) -> QuerySpec {
        let limit = self.limit.unwrap_or(default_limit);
        QuerySpec {
            search: self.search.clone(),
            category: self.category,
            filters: QueryFilters {
                max_cost: self.max_cost,
                free_only: self.free_only,
                transit_only: self.transit_only,
                virtual_only: self.virtual_only,
                scholarship_only: self.scholarship_only,
                min_comments: self.min_comments,
                min_enrollments: self.min_enrollments,
                eligible_only: self.eligible_only,
            },
            sort: self.sort.unwrap_or(default_sort),
            page: (limit > 0 || self.offset > 0).then_some(Page {
                offset: self.offset,
                limit: if limit == 0 { usize::MAX } else { limit },
            }),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Search, filter and rank opportunities.
    Query(QueryArgs),
    /// Summarize a catalog: category counts, flags, upcoming deadlines.
    Stats {
        /// Catalog file (.json or .toml); defaults to config `catalog`
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Engagement counters JSON
        #[arg(long, value_name = "FILE")]
        engagement: Option<PathBuf>,

        /// Days ahead to list deadlines; defaults to config `deadline_window_days`
        #[arg(long, value_name = "DAYS")]
        window_days: Option<u32>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "oppfinder",
    about = "Find and rank extracurricular and admissions opportunities",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config catalog path
    #[arg(long = "catalog-path", value_name = "FILE")]
    pub catalog_path: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            catalog: self
                .catalog_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
