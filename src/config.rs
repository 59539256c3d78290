//! Configuration management for tily.
//!
//! Configuration is loaded from multiple sources in priority order:
//! 1. Command-line flags (applied by the binary on top of [`Config`])
//! 2. Environment variables (`TILY_ROWS`, `TILY_COLS`, `TILY_SPEED`, `TILY_LOG`)
//! 3. A file given with `--config`
//! 4. Project-local config file (`./tily.toml`)
//! 5. User config file (`~/.config/tily/config.toml`)
//! 6. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # tily.toml
//! rows = 10
//! cols = 12
//! start = "center"     # top-left, top-right, bottom-left, bottom-right, center
//! speed = 80           # 5 (slow) ..= 100 (no delay)
//! log_file = "tily.log"
//! export_basename = "board"
//! project_file = "project.json"
//! ```

use crate::board::DEFAULT_SIZE;
use crate::interpreter::constants::SPEED_DEFAULT;
use crate::project::StartCorner;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// tily configuration. Unset fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub rows: Option<i64>,
    pub cols: Option<i64>,
    pub start: Option<StartCorner>,
    pub speed: Option<i64>,

    /// Where the TUI writes its log; no log when unset
    pub log_file: Option<String>,

    pub export_basename: Option<String>,
    pub project_file: Option<String>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it was read from.
    pub fn load(explicit: Option<&Path>) -> (Self, Vec<PathBuf>) {
        let mut config = Self::default();
        let mut sources = Vec::new();

        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(user) = Self::user_config_path() {
            candidates.push(user);
        }
        candidates.push(PathBuf::from("tily.toml"));
        if let Some(path) = explicit {
            candidates.push(path.to_path_buf());
        }

        for path in candidates {
            if let Some(file_config) = Self::load_from_file(&path) {
                config.merge(file_config);
                sources.push(path);
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        (config, sources)
    }

    pub fn rows(&self) -> i64 {
        self.rows.unwrap_or(DEFAULT_SIZE as i64)
    }

    pub fn cols(&self) -> i64 {
        self.cols.unwrap_or(DEFAULT_SIZE as i64)
    }

    pub fn start(&self) -> StartCorner {
        self.start.unwrap_or_default()
    }

    pub fn speed(&self) -> i64 {
        self.speed.unwrap_or(i64::from(SPEED_DEFAULT))
    }

    pub fn export_basename(&self) -> String {
        self.export_basename
            .clone()
            .unwrap_or_else(|| "board".to_string())
    }

    pub fn project_file(&self) -> PathBuf {
        PathBuf::from(
            self.project_file
                .clone()
                .unwrap_or_else(|| "project.json".to_string()),
        )
    }

    /// `~/.config/tily/config.toml` or the platform equivalent
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tily").join("config.toml"))
    }

    /// Load configuration from a specific file; `None` if absent or invalid.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    eprintln!("warning: ignoring {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                eprintln!("warning: cannot read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Only overrides fields that are Some in the other config.
    pub fn merge(&mut self, other: Self) {
        if other.rows.is_some() {
            self.rows = other.rows;
        }
        if other.cols.is_some() {
            self.cols = other.cols;
        }
        if other.start.is_some() {
            self.start = other.start;
        }
        if other.speed.is_some() {
            self.speed = other.speed;
        }
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
        if other.export_basename.is_some() {
            self.export_basename = other.export_basename;
        }
        if other.project_file.is_some() {
            self.project_file = other.project_file;
        }
    }

    /// Apply environment variable overrides read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let number = |key: &str| -> Option<i64> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    eprintln!("warning: ignoring {}={:?}: not a number", key, raw);
                    None
                }
            }
        };
        if let Some(rows) = number("TILY_ROWS") {
            self.rows = Some(rows);
        }
        if let Some(cols) = number("TILY_COLS") {
            self.cols = Some(cols);
        }
        if let Some(speed) = number("TILY_SPEED") {
            self.speed = Some(speed);
        }
        if let Some(path) = lookup("TILY_LOG") {
            self.log_file = Some(path);
        }
    }

    /// Generate a sample config file content.
    pub fn sample_config() -> String {
        r#"# tily configuration
# Place this file at ~/.config/tily/config.toml or ./tily.toml

rows = 15
cols = 15
start = "top-left"
speed = 50
# log_file = "tily.log"
export_basename = "board"
project_file = "project.json"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rows(), 15);
        assert_eq!(config.cols(), 15);
        assert_eq!(config.start(), StartCorner::TopLeft);
        assert_eq!(config.speed(), 50);
        assert_eq!(config.export_basename(), "board");
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.start, Some(StartCorner::TopLeft));
        assert_eq!(config.project_file(), PathBuf::from("project.json"));
    }

    #[test]
    fn test_merge_and_env_overrides() {
        let mut config: Config = toml::from_str("rows = 4\nstart = \"center\"").unwrap();
        config.merge(toml::from_str("cols = 9").unwrap());
        config.apply_env_overrides(|key| match key {
            "TILY_ROWS" => Some("7".to_string()),
            "TILY_SPEED" => Some("fast".to_string()),
            _ => None,
        });
        assert_eq!(config.rows(), 7);
        assert_eq!(config.cols(), 9);
        assert_eq!(config.start(), StartCorner::Center);
        assert_eq!(config.speed(), 50);
    }
}
