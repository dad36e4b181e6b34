//! Core data types for the whale-tracker system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Post timestamp (UTC).
pub type Timestamp = DateTime<Utc>;

/// Word tokens of one post, in order of appearance.
pub type TokenSequence = Vec<String>;

/// Tokens after marker spans have been collapsed into single fields.
pub type ParsedFields = Vec<String>;

/// Fewest fields a record can be assembled from (no recipient).
pub const MIN_RECORD_FIELDS: usize = 6;
/// Most fields a record can be assembled from.
pub const MAX_RECORD_FIELDS: usize = 7;

/// Date layout used in the output tables (`2024-01-01 00:01:30+00:00`).
pub const TABLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Format a timestamp the way the output tables store it.
#[inline]
pub fn format_table_date(ts: &Timestamp) -> String {
    ts.format(TABLE_DATE_FORMAT).to_string()
}

/// A single post fetched from the social feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    /// Post body as published.
    pub text: String,
    /// Publication time.
    pub timestamp: Timestamp,
}

impl RawPost {
    /// Create a post.
    pub fn new(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// A structurally valid transaction announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Publication time of the source post.
    pub timestamp: Timestamp,
    /// Number of units moved (integer digits as published).
    pub amount_units: String,
    /// Asset ticker (e.g. "BTC").
    pub asset: String,
    /// Value of the transfer (integer digits as published).
    pub amount_usd: String,
    /// Currency of `amount_usd` (e.g. "USD").
    pub currency: String,
    /// Verb of the announcement (e.g. "transferred", "burned").
    pub action: String,
    /// Sender entity, or the venue for "at" announcements.
    pub from: String,
    /// Receiver entity; absent for mint/burn style announcements.
    pub to: Option<String>,
}

/// Why a post was routed to the junk stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JunkReason {
    /// Field 0 is missing or not an integer.
    NonNumericQuantity,
    /// Field 2 is missing or not an integer.
    NonNumericUsdAmount,
    /// Parsed field count outside the accepted range.
    FieldCount(usize),
}

impl fmt::Display for JunkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JunkReason::NonNumericQuantity => write!(f, "non-numeric quantity"),
            JunkReason::NonNumericUsdAmount => write!(f, "non-numeric USD amount"),
            JunkReason::FieldCount(n) => write!(f, "unexpected field count {n}"),
        }
    }
}

/// Validator outcome for one parsed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Conforms to the announcement shape.
    Clean,
    /// Does not conform; kept for inspection.
    Junk(JunkReason),
}

impl Classification {
    /// Is this a clean classification?
    #[inline]
    pub fn is_clean(self) -> bool {
        matches!(self, Classification::Clean)
    }
}

/// A post that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunkEntry {
    /// Publication time of the source post.
    pub timestamp: Timestamp,
    /// Post tokens joined by single spaces.
    pub text: String,
    /// First validation rule that failed.
    pub reason: JunkReason,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Posts returned by the feed.
    pub fetched: usize,
    /// Posts inside the recency window.
    pub in_window: usize,
    /// Clean records produced.
    pub clean: usize,
    /// Junk entries produced.
    pub junk: usize,
}
