//! Clean/junk partitioning with timestamp alignment.
//!
//! Posts and their timestamps arrive as two index-aligned sequences.
//! Each index is routed exactly once, in a single forward pass, and its
//! timestamp travels with it, so both output streams stay aligned and
//! keep the input order.

use crate::validator::RecordValidator;
use whale_core::{
    Classification, Error, JunkReason, ParsedFields, Result, Timestamp, TokenSequence,
};

/// A tokenized and extracted post awaiting classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Tokenizer output.
    pub tokens: TokenSequence,
    /// Marker extractor output.
    pub fields: ParsedFields,
}

/// A post routed to the junk stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Tokens joined by single spaces.
    pub text: String,
    /// First validation rule that failed.
    pub reason: JunkReason,
}

/// Statistics about classification outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Total posts classified.
    pub total: u64,
    /// Posts classified as clean.
    pub clean: u64,
    /// Posts classified as junk.
    pub junk: u64,
    /// Junk because field 0 was not an integer.
    pub non_numeric_quantity: u64,
    /// Junk because field 2 was not an integer.
    pub non_numeric_usd_amount: u64,
    /// Junk because of the field count.
    pub bad_field_count: u64,
}

impl ClassificationStats {
    /// Account for one classification.
    pub fn record(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::Clean => self.clean += 1,
            Classification::Junk(reason) => {
                self.junk += 1;
                match reason {
                    JunkReason::NonNumericQuantity => self.non_numeric_quantity += 1,
                    JunkReason::NonNumericUsdAmount => self.non_numeric_usd_amount += 1,
                    JunkReason::FieldCount(_) => self.bad_field_count += 1,
                }
            }
        }
    }

    /// Fraction of posts classified as junk.
    pub fn junk_frac(&self) -> f64 {
        if self.total > 0 {
            self.junk as f64 / self.total as f64
        } else {
            0.0
        }
    }
}

/// Output of a partition pass. Each content list is index-aligned with
/// its timestamp list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Parsed fields of clean posts.
    pub clean: Vec<ParsedFields>,
    /// Timestamps of clean posts.
    pub clean_timestamps: Vec<Timestamp>,
    /// Junk posts.
    pub junk: Vec<Rejected>,
    /// Timestamps of junk posts.
    pub junk_timestamps: Vec<Timestamp>,
    /// Outcome counts.
    pub stats: ClassificationStats,
}

/// Routes candidates into the clean and junk streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct Partitioner {
    validator: RecordValidator,
}

impl Partitioner {
    /// Create a partitioner using `validator` for classification.
    pub fn new(validator: RecordValidator) -> Self {
        Self { validator }
    }

    /// Split candidates and their timestamps into clean and junk streams.
    ///
    /// Fails if the two sequences differ in length.
    pub fn partition(
        &self,
        candidates: Vec<Candidate>,
        timestamps: Vec<Timestamp>,
    ) -> Result<Partition> {
        if candidates.len() != timestamps.len() {
            return Err(Error::data(format!(
                "{} posts but {} timestamps",
                candidates.len(),
                timestamps.len()
            )));
        }

        let mut out = Partition::default();
        for (candidate, ts) in candidates.into_iter().zip(timestamps) {
            let classification = self.validator.classify(&candidate.fields);
            out.stats.record(classification);

            match classification {
                Classification::Clean => {
                    out.clean.push(candidate.fields);
                    out.clean_timestamps.push(ts);
                }
                Classification::Junk(reason) => {
                    out.junk.push(Rejected {
                        text: candidate.tokens.join(" "),
                        reason,
                    });
                    out.junk_timestamps.push(ts);
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::MarkerExtractor;
    use crate::tokenizer::tokenize;
    use chrono::{TimeZone, Utc};

    fn make_candidate(text: &str) -> Candidate {
        let tokens = tokenize(text);
        let fields = MarkerExtractor::default().extract(&tokens);
        Candidate { tokens, fields }
    }

    fn ts(minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap()
    }

    const CLEAN: &str = "1000 BTC 27000000 USD transferred from unknown wallet to Binance";
    const JUNK: &str = "something went wrong no numbers here";

    #[test]
    fn test_alternating_junk_keeps_alignment() {
        let texts = [JUNK, CLEAN, JUNK, JUNK, CLEAN, "5 ETH 9000 USD moved"];
        let candidates: Vec<Candidate> = texts.iter().map(|t| make_candidate(t)).collect();
        let timestamps: Vec<Timestamp> = (0..6).map(ts).collect();

        let p = Partitioner::default().partition(candidates, timestamps).unwrap();

        assert_eq!(p.clean.len(), 2);
        assert_eq!(p.clean_timestamps, vec![ts(1), ts(4)]);
        assert_eq!(p.junk.len(), 4);
        assert_eq!(p.junk_timestamps, vec![ts(0), ts(2), ts(3), ts(5)]);
        assert_eq!(p.junk[0].text, JUNK);
        assert_eq!(p.junk[3].text, "5 ETH 9000 USD moved");
        assert_eq!(p.junk[3].reason, JunkReason::FieldCount(5));
    }

    #[test]
    fn test_completeness() {
        let texts = [CLEAN, JUNK, CLEAN, "", "12 BTC x"];
        let candidates: Vec<Candidate> = texts.iter().map(|t| make_candidate(t)).collect();
        let timestamps: Vec<Timestamp> = (0..5).map(ts).collect();

        let p = Partitioner::default().partition(candidates, timestamps.clone()).unwrap();

        assert_eq!(p.clean.len() + p.junk.len(), texts.len());
        assert_eq!(p.clean.len(), p.clean_timestamps.len());
        assert_eq!(p.junk.len(), p.junk_timestamps.len());

        let mut all: Vec<Timestamp> = p
            .clean_timestamps
            .iter()
            .chain(p.junk_timestamps.iter())
            .copied()
            .collect();
        all.sort();
        assert_eq!(all, timestamps);
    }

    #[test]
    fn test_stats() {
        let texts = [CLEAN, JUNK, "1 BTC USD a b c", "1 BTC 2 USD moved"];
        let candidates: Vec<Candidate> = texts.iter().map(|t| make_candidate(t)).collect();
        let timestamps: Vec<Timestamp> = (0..4).map(ts).collect();

        let p = Partitioner::default().partition(candidates, timestamps).unwrap();

        assert_eq!(p.stats.total, 4);
        assert_eq!(p.stats.clean, 1);
        assert_eq!(p.stats.junk, 3);
        assert_eq!(p.stats.non_numeric_quantity, 1);
        assert_eq!(p.stats.non_numeric_usd_amount, 1);
        assert_eq!(p.stats.bad_field_count, 1);
        assert!((p.stats.junk_frac() - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let candidates = vec![make_candidate(CLEAN)];
        let result = Partitioner::default().partition(candidates, vec![ts(0), ts(1)]);
        assert!(matches!(result, Err(Error::Data(_))));
    }

    #[test]
    fn test_empty_batch() {
        let p = Partitioner::default().partition(Vec::new(), Vec::new()).unwrap();
        assert_eq!(p, Partition::default());
        assert_eq!(p.stats.junk_frac(), 0.0);
    }
}
