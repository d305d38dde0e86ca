//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::rates::HOURS_PER_DAY;
use crate::yaml::{parse_yaml_str, YamlError};

/// Directory holding per-workspace settings
pub const LOCAL_CONFIG_DIR: &str = ".orca";

/// Orca configuration with layered hierarchy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default hourly rate; a day of labor is this times [`HOURS_PER_DAY`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,

    /// Monthly revenue goal used by portfolio summaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_goal: Option<f64>,

    /// Company name printed on quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Default author for new budgets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&cwd)
    }

    /// Same as [`Config::load`] with an explicit workspace directory
    pub fn load_from(workspace: &Path) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/orca/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.orca/config.yaml)
        if let Some(local) = Self::read_file(&Self::local_config_path(workspace)) {
            config.merge(local);
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "orca")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Path to the workspace config file under `workspace`
    pub fn local_config_path(workspace: &Path) -> PathBuf {
        workspace.join(LOCAL_CONFIG_DIR).join("config.yaml")
    }

    /// Read only the file at `path`, without merging other layers.
    ///
    /// A missing or empty file is an empty layer. A file that exists but
    /// does not parse is an error, so callers never write over it.
    pub fn read_layer(path: &Path) -> Result<Config, YamlError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        parse_yaml_str(&contents, &path.display().to_string())
    }

    /// Write this layer to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yml::to_string(self).map_err(std::io::Error::other)?;
        std::fs::write(path, yaml)
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Apply `ORCA_*` overrides through the given lookup
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("ORCA_HOURLY_RATE").and_then(|v| v.trim().parse().ok()) {
            self.hourly_rate = Some(rate);
        }
        if let Some(goal) = lookup("ORCA_MONTHLY_GOAL").and_then(|v| v.trim().parse().ok()) {
            self.monthly_goal = Some(goal);
        }
        if let Some(author) = lookup("ORCA_AUTHOR") {
            self.author = Some(author);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.hourly_rate.is_some() {
            self.hourly_rate = other.hourly_rate;
        }
        if other.monthly_goal.is_some() {
            self.monthly_goal = other.monthly_goal;
        }
        if other.company_name.is_some() {
            self.company_name = other.company_name;
        }
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Configured daily rate, zero when no hourly rate is set
    pub fn daily_rate(&self) -> f64 {
        self.hourly_rate.unwrap_or(0.0) * HOURS_PER_DAY
    }

    /// Get the author name, falling back to the login name
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
