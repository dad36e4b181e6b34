//! Configuration structures for the whale-tracker system.

use crate::error::{Error, Result};
use crate::types::{MAX_RECORD_FIELDS, MIN_RECORD_FIELDS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed fetching configuration.
    pub feed: FeedConfig,
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Output storage configuration.
    pub storage: StorageConfig,
}

impl Config {
    /// Load a configuration from a JSON file.
    ///
    /// Sections or keys missing from the file keep their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.feed.account.trim().is_empty() {
            return Err(Error::config("feed.account must not be empty"));
        }
        if self.feed.max_posts == 0 {
            return Err(Error::config("feed.max_posts must be at least 1"));
        }
        if self.feed.window_hours == 0 {
            return Err(Error::config("feed.window_hours must be at least 1"));
        }
        if self.parser.min_fields < MIN_RECORD_FIELDS || self.parser.max_fields > MAX_RECORD_FIELDS {
            return Err(Error::config(format!(
                "parser field bounds must lie within {MIN_RECORD_FIELDS}..={MAX_RECORD_FIELDS}"
            )));
        }
        if self.parser.min_fields > self.parser.max_fields {
            return Err(Error::config(format!(
                "parser.min_fields ({}) exceeds parser.max_fields ({})",
                self.parser.min_fields, self.parser.max_fields
            )));
        }
        Ok(())
    }
}

/// Feed-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Account whose timeline is read.
    pub account: String,
    /// Maximum number of most recent posts fetched per run.
    pub max_posts: usize,
    /// Only posts newer than this many hours are processed.
    pub window_hours: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            account: "whale_alert".to_string(),
            max_posts: 50,
            window_hours: 24,
        }
    }
}

impl FeedConfig {
    /// Recency window as a duration.
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.window_hours))
    }
}

/// Structural validation bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Minimum number of parsed fields for a clean record.
    pub min_fields: usize,
    /// Maximum number of parsed fields for a clean record.
    pub max_fields: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_fields: MIN_RECORD_FIELDS,
            max_fields: MAX_RECORD_FIELDS,
        }
    }
}

/// Output table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both tables.
    pub output_dir: PathBuf,
    /// File name of the clean records table.
    pub records_file: String,
    /// File name of the junk table.
    pub junk_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            records_file: "whale_alert_tweets.csv".to_string(),
            junk_file: "junk_whale_alert_tweets.csv".to_string(),
        }
    }
}

impl StorageConfig {
    /// Full path of the records table.
    pub fn records_path(&self) -> PathBuf {
        self.output_dir.join(&self.records_file)
    }

    /// Full path of the junk table.
    pub fn junk_path(&self) -> PathBuf {
        self.output_dir.join(&self.junk_file)
    }
}
