//! Adapters around the parsing pipeline.
//!
//! This crate provides:
//! - Feed sources supplying raw posts
//! - The tabular sink persisting clean records and junk entries

pub mod csv_sink;
pub mod feed;

pub use csv_sink::{CsvSink, TabularSink, JUNK_COLUMNS, RECORD_COLUMNS};
pub use feed::{FeedSource, JsonFileFeed, MemoryFeed};
