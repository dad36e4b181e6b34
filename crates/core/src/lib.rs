//! Core types and configuration for the whale-tracker system.
//!
//! This crate provides shared types used across all other crates:
//! - Post and record types (raw posts, transaction records, junk entries)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
