//! Configuration module for `OpportunityFinder`

use crate::core::query::SortMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`]
pub const KEYS: [&str; 9] = [
    "level",
    "file",
    "verbose",
    "catalog",
    "profile",
    "engagement",
    "default_sort",
    "page_size",
    "deadline_window_days",
];

/// Placeholder expanded to the config directory in path-like values
const DIR_VARIABLE: &str = "$OPPFINDER";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Default input files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Catalog file (`.json` or `.toml`)
    #[serde(default)]
    pub catalog: String,
    /// User profile file (`.json`)
    #[serde(default)]
    pub profile: String,
    /// Engagement counters file (`.json`)
    #[serde(default)]
    pub engagement: String,
}

/// Query defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Sort mode used when `--sort` is omitted
    #[serde(default)]
    pub default_sort: String,
    /// Results per page when `--limit` is omitted; 0 means unset
    #[serde(default)]
    pub page_size: usize,
    /// Days ahead `stats` looks for deadlines; 0 means unset
    #[serde(default)]
    pub deadline_window_days: i64,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Input file settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Query defaults
    #[serde(default)]
    pub query: QueryConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override catalog path
    pub catalog: Option<String>,
}

impl Config {
    /// Get the `$OPPFINDER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/oppfinder`
    /// - macOS: `~/Library/Application Support/oppfinder`
    /// - Windows: `%APPDATA%\oppfinder`
    #[must_use]
    pub fn get_oppfinder_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("oppfinder")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Empty strings and zero numbers count as missing. Existing user values
    /// are never replaced.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        fn fill(target: &mut String, default: &str) -> bool {
            if target.is_empty() && !default.is_empty() {
                default.clone_into(target);
                true
            } else {
                false
            }
        }

        let mut changed = fill(&mut self.logging.level, &defaults.logging.level);
        changed |= fill(&mut self.logging.file, &defaults.logging.file);
        changed |= fill(&mut self.paths.catalog, &defaults.paths.catalog);
        changed |= fill(&mut self.paths.profile, &defaults.paths.profile);
        changed |= fill(&mut self.paths.engagement, &defaults.paths.engagement);
        changed |= fill(&mut self.query.default_sort, &defaults.query.default_sort);

        if self.query.page_size == 0 && defaults.query.page_size != 0 {
            self.query.page_size = defaults.query.page_size;
            changed = true;
        }
        if self.query.deadline_window_days == 0 && defaults.query.deadline_window_days != 0 {
            self.query.deadline_window_days = defaults.query.deadline_window_days;
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; the config file is not touched.
    /// Only non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(catalog) = &overrides.catalog {
            self.paths.catalog.clone_from(catalog);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_oppfinder_dir`](Self::get_oppfinder_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_oppfinder_dir().join(CONFIG_FILE_NAME)
    }

    /// Replace `$OPPFINDER` with the config directory
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_oppfinder_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults and `$OPPFINDER` is expanded
    /// in every path-like value.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog = Self::expand_variables(&config.paths.catalog);
        config.paths.profile = Self::expand_variables(&config.paths.profile);
        config.paths.engagement = Self::expand_variables(&config.paths.engagement);

        Ok(config)
    }

    /// Load configuration from the compiled-in defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// An existing file gets any newly added default fields merged in and is
    /// saved back. Any read or parse error falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        let loaded = fs::read_to_string(&config_file)
            .ok()
            .and_then(|content| Self::from_toml(&content).ok());
        match loaded {
            Some(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            None => defaults,
        }
    }

    /// Save configuration to file
    ///
    /// The config directory is created if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys are listed in [`KEYS`]. Dashed spellings
    /// (`page-size`) are accepted too.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key.replace('-', "_").as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog" => Some(self.paths.catalog.clone()),
            "profile" => Some(self.paths.profile.clone()),
            "engagement" => Some(self.paths.engagement.clone()),
            "default_sort" => Some(self.query.default_sort.clone()),
            "page_size" => Some(self.query.page_size.to_string()),
            "deadline_window_days" => Some(self.query.deadline_window_days.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated: `verbose` must be a boolean, `default_sort` a
    /// known sort mode, `level` a known log level and the numeric keys
    /// non-negative integers. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => {
                value.parse::<crate::logger::Level>()?;
                self.logging.level = value.to_ascii_lowercase();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "catalog" => self.paths.catalog = value.to_string(),
            "profile" => self.paths.profile = value.to_string(),
            "engagement" => self.paths.engagement = value.to_string(),
            "default_sort" => {
                self.query.default_sort = value.parse::<SortMode>()?.as_str().to_string();
            }
            "page_size" => {
                self.query.page_size = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid number for 'page_size': '{value}'"))?;
            }
            "deadline_window_days" => {
                self.query.deadline_window_days = value
                    .parse::<u32>()
                    .map(i64::from)
                    .map_err(|_| format!("Invalid number for 'deadline_window_days': '{value}'"))?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog" => self.paths.catalog.clone_from(&defaults.paths.catalog),
            "profile" => self.paths.profile.clone_from(&defaults.paths.profile),
            "engagement" => self.paths.engagement.clone_from(&defaults.paths.engagement),
            "default_sort" => self
                .query
                .default_sort
                .clone_from(&defaults.query.default_sort),
            "page_size" => self.query.page_size = defaults.query.page_size,
            "deadline_window_days" => {
                self.query.deadline_window_days = defaults.query.deadline_window_days;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the config file so the next [`load()`](Config::load) recreates it
    ///
    /// Succeeds without doing anything when no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// The configured default sort, falling back to `Popular` when unset or invalid
    #[must_use]
    pub fn default_sort(&self) -> SortMode {
        self.query.default_sort.parse().unwrap_or_default()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog = \"{}\"", self.paths.catalog)?;
        writeln!(f, "  profile = \"{}\"", self.paths.profile)?;
        writeln!(f, "  engagement = \"{}\"", self.paths.engagement)?;

        writeln!(f, "\n[query]")?;
        writeln!(f, "  default_sort = \"{}\"", self.query.default_sort)?;
        writeln!(f, "  page_size = {}", self.query.page_size)?;
        writeln!(
            f,
            "  deadline_window_days = {}",
            self.query.deadline_window_days
        )?;

        Ok(())
    }
}
