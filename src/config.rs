//! Configuration file support for licw-score.
//!
//! Loads defaults from `~/.config/licw-score/config.toml` on Linux
//! (or platform-appropriate location on other OSes). Command-line flags
//! take precedence over anything set here.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::challenge::DateRange;
use crate::quarter::{Quarter, QuarterError, parse_yyyymmdd};

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quarter to score, e.g. "2025Q3".
    pub quarter: Option<String>,

    /// Inclusive start date as YYYYMMDD; overrides the quarter's start.
    pub start: Option<String>,

    /// Inclusive end date as YYYYMMDD; overrides the quarter's end.
    pub end: Option<String>,

    /// Report format.
    pub format: Option<OutputFormat>,

    /// List every counted QSO in the report.
    pub list: bool,

    /// Tracing filter, e.g. "warn" or "licw_score=debug".
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("licw-score/config.toml"))
    }

    /// Resolve the quarter and explicit dates into a date range.
    ///
    /// Explicit start/end dates replace the corresponding quarter bound.
    pub fn date_range(&self) -> Result<DateRange, QuarterError> {
        let mut range = match &self.quarter {
            Some(q) => Quarter::parse(q)?.date_range(),
            None => DateRange::default(),
        };
        if let Some(start) = &self.start {
            range.start = Some(parse_yyyymmdd(start)?);
        }
        if let Some(end) = &self.end {
            range.end = Some(parse_yyyymmdd(end)?);
        }
        Ok(range)
    }
}
