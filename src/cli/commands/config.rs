//! Config command handler

use crate::args::ConfigSubcommand;
use opportunity_finder::config::{Config, KEYS};
use opportunity_finder::{error, info};
use std::io::{self, Write};

/// Dispatch config subcommands
///
/// # Errors
/// Returns a printable message when a key is unknown, a value is invalid or
/// the config file cannot be written.
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    config: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    }
}

fn unknown_key(key: &str) -> String {
    format!("✗ Unknown config key: '{key}' (known keys: {})", KEYS.join(", "))
}

fn save(config: &Config) -> Result<(), String> {
    config.save().map_err(|e| {
        error!("Failed to save config: {e}");
        format!("✗ Failed to save config: {e}")
    })
}

/// Handle the config get subcommand
///
/// # Errors
/// Returns a message when `key` is not a known config key.
pub fn handle_config_get(config: &Config, key: Option<String>) -> Result<(), String> {
    if let Some(k) = key {
        let value = config.get(&k).ok_or_else(|| unknown_key(&k))?;
        println!("{value}");
    } else {
        println!("\n=== Configuration ===");
        println!("({})\n", Config::get_config_file_path().display());
        print!("{config}");
    }
    Ok(())
}

/// Handle the config set subcommand
///
/// # Errors
/// Returns a message when the key or value is rejected or saving fails.
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value).map_err(|e| format!("✗ {e}"))?;
    save(config)?;
    info!("Config key {key} set to {value}");
    println!("✓ Set {key} = {}", config.get(key).unwrap_or_default());
    Ok(())
}

/// Handle the config unset subcommand
///
/// # Errors
/// Returns a message when the key is unknown or saving fails.
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults).map_err(|_| unknown_key(key))?;
    save(config)?;
    println!("✓ Reset {key} to default");
    Ok(())
}

/// Handle the config reset subcommand
///
/// # Errors
/// Returns a message when the config file exists but cannot be removed.
pub fn handle_config_reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let answer = response.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}
