//! Post parsing and classification for the whale-tracker system.
//!
//! This crate handles:
//! - Tokenization of raw post text
//! - Marker-based field extraction ("from X to Y", "at Z")
//! - Structural validation (clean vs junk)
//! - Timestamp-aligned partitioning and record assembly

pub mod assembler;
pub mod extractor;
pub mod partitioner;
pub mod pipeline;
pub mod tokenizer;
pub mod validator;

pub use assembler::{assemble_junk, assemble_record};
pub use extractor::{MarkerExtractor, MarkerRule};
pub use partitioner::{Candidate, ClassificationStats, Partition, Partitioner, Rejected};
pub use pipeline::{BatchOutput, Pipeline};
pub use tokenizer::tokenize;
pub use validator::RecordValidator;
