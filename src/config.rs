// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest precedence first: built-in defaults, the TOML config file,
//! then `TRIPLINE_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `tripline config`
pub const KEYS: [&str; 3] = ["journal", "log_level", "color"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Journal JSON file
    pub journal: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Colored terminal output
    pub color: bool,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "tripline", "tripline")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal: project_dirs()
                .map(|d| d.data_dir().join("journal.json"))
                .unwrap_or_else(|| PathBuf::from("journal.json")),
            log_level: "warn".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Current value of a key as text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "journal" => Ok(self.journal.display().to_string()),
            "log_level" => Ok(self.log_level.clone()),
            "color" => Ok(self.color.to_string()),
            _ => anyhow::bail!("Unknown config key: {}. Known keys: {}", key, KEYS.join(", ")),
        }
    }
}

/// Default config file location
#[must_use]
pub fn default_path() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("tripline.toml"))
}

/// Load configuration from `path` (or the default location) and the environment
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = path.map_or_else(default_path, Path::to_path_buf);
    let defaults = Config::default();

    let settings = config::Config::builder()
        .set_default("journal", defaults.journal.display().to_string())?
        .set_default("log_level", defaults.log_level)?
        .set_default("color", defaults.color)?
        .add_source(config::File::from(path.as_path()).required(false))
        .add_source(config::Environment::with_prefix("TRIPLINE"))
        .build()
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    settings
        .try_deserialize()
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Persist one key to the config file, keeping the other entries
pub fn set_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut table: toml::Table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        content
            .parse()
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let entry = match key {
        "journal" | "log_level" => toml::Value::String(value.to_string()),
        "color" => toml::Value::Boolean(
            value
                .parse()
                .with_context(|| format!("color must be true or false, got {value}"))?,
        ),
        _ => anyhow::bail!("Unknown config key: {}. Known keys: {}", key, KEYS.join(", ")),
    };
    table.insert(key.to_string(), entry);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, toml::to_string_pretty(&table)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Set {} in {}", key, path.display());
    Ok(())
}
