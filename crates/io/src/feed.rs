//! Feed sources.
//!
//! A feed returns the most recent posts of an account, newest first.
//! Network clients live outside this crate; [`JsonFileFeed`] reads a
//! post export from disk and [`MemoryFeed`] serves posts held in memory.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use whale_core::{Error, RawPost, Result};

/// Supplies raw posts for an account.
pub trait FeedSource {
    /// Fetch at most `count` most recent posts of `account`, newest first.
    fn fetch(&self, account: &str, count: usize) -> Result<Vec<RawPost>>;
}

/// Sort newest first (stable for equal timestamps) and keep `count`.
fn newest_first(mut posts: Vec<RawPost>, count: usize) -> Vec<RawPost> {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts.truncate(count);
    posts
}

/// In-memory feed.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    posts: Vec<RawPost>,
}

impl MemoryFeed {
    /// Serve `posts` for every account.
    pub fn new(posts: Vec<RawPost>) -> Self {
        Self { posts }
    }
}

impl FeedSource for MemoryFeed {
    fn fetch(&self, _account: &str, count: usize) -> Result<Vec<RawPost>> {
        Ok(newest_first(self.posts.clone(), count))
    }
}

/// One post of a JSON export.
#[derive(Debug, Deserialize)]
struct ExportedPost {
    text: String,
    created_at: String,
    #[serde(default)]
    account: Option<String>,
}

/// Feed backed by a JSON array of posts:
/// `[{ "text": "...", "created_at": "...", "account": "..." }]`.
///
/// Posts without an `account` belong to every account.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    /// Create a feed reading `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the export file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an export held in memory.
    pub fn parse(json: &str, account: &str) -> Result<Vec<RawPost>> {
        let exported: Vec<ExportedPost> = serde_json::from_str(json)?;
        exported
            .into_iter()
            .filter(|p| p.account.as_deref().map_or(true, |a| a == account))
            .map(|p| {
                let timestamp = parse_created_at(&p.created_at)?;
                Ok(RawPost::new(p.text, timestamp))
            })
            .collect()
    }
}

impl FeedSource for JsonFileFeed {
    fn fetch(&self, account: &str, count: usize) -> Result<Vec<RawPost>> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::feed(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let posts = Self::parse(&json, account)?;
        debug!(
            path = %self.path.display(),
            account,
            available = posts.len(),
            count,
            "loaded post export"
        );
        Ok(newest_first(posts, count))
    }
}

/// Parse a post creation time.
///
/// Supports RFC 3339 (`2024-05-10T17:55:00Z`) and the classic timeline
/// format (`Fri May 10 17:55:00 +0000 2024`).
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return Ok(dt.with_timezone(&Utc));
    }
    Err(Error::feed(format!("unrecognized created_at: {raw:?}")))
}
