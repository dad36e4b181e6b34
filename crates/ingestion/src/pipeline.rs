//! Batch pipeline: window filter, tokenize, extract, partition, assemble.

use crate::assembler::{assemble_junk, assemble_record};
use crate::extractor::MarkerExtractor;
use crate::partitioner::{Candidate, ClassificationStats, Partition, Partitioner};
use crate::tokenizer::tokenize;
use crate::validator::RecordValidator;
use chrono::Duration;
use tracing::{debug, info};
use whale_core::{
    BatchSummary, Config, JunkEntry, RawPost, Result, Timestamp, TransactionRecord,
};

/// Everything one run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutput {
    /// Clean records, in input order.
    pub records: Vec<TransactionRecord>,
    /// Junk entries, in input order.
    pub junk: Vec<JunkEntry>,
    /// Classification counts.
    pub stats: ClassificationStats,
    /// Counts for reporting.
    pub summary: BatchSummary,
}

/// Stateless post-to-record pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: MarkerExtractor,
    partitioner: Partitioner,
    window: Duration,
}

impl Pipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            MarkerExtractor::default(),
            RecordValidator::from_config(&config.parser),
            config.feed.window(),
        )
    }

    /// Create a pipeline from explicit components.
    pub fn with_parts(
        extractor: MarkerExtractor,
        validator: RecordValidator,
        window: Duration,
    ) -> Self {
        Self {
            extractor,
            partitioner: Partitioner::new(validator),
            window,
        }
    }

    /// Recency window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Posts strictly newer than `now - window`, in input order.
    pub fn filter_window<'a>(&self, posts: &'a [RawPost], now: Timestamp) -> Vec<&'a RawPost> {
        let cutoff = now - self.window;
        posts.iter().filter(|p| p.timestamp > cutoff).collect()
    }

    /// Tokenize and extract one post.
    pub fn prepare(&self, text: &str) -> Candidate {
        let tokens = tokenize(text);
        let fields = self.extractor.extract(&tokens);
        Candidate { tokens, fields }
    }

    /// Run the whole batch.
    ///
    /// Malformed posts never fail the batch; they land in
    /// [`BatchOutput::junk`].
    pub fn process(&self, posts: &[RawPost], now: Timestamp) -> Result<BatchOutput> {
        let recent = self.filter_window(posts, now);
        debug!(
            fetched = posts.len(),
            in_window = recent.len(),
            window_hours = self.window.num_hours(),
            "filtered posts to recency window"
        );

        let (candidates, timestamps): (Vec<Candidate>, Vec<Timestamp>) = recent
            .iter()
            .map(|post| (self.prepare(&post.text), post.timestamp))
            .unzip();

        let Partition {
            clean,
            clean_timestamps,
            junk,
            junk_timestamps,
            stats,
        } = self.partitioner.partition(candidates, timestamps)?;

        let records = clean
            .into_iter()
            .zip(clean_timestamps)
            .map(|(fields, ts)| assemble_record(fields, ts))
            .collect::<Result<Vec<_>>>()?;

        let junk: Vec<JunkEntry> = junk
            .into_iter()
            .zip(junk_timestamps)
            .map(|(rejected, ts)| assemble_junk(rejected, ts))
            .collect();

        for entry in &junk {
            debug!(reason = %entry.reason, text = %entry.text, "post routed to junk");
        }

        let summary = BatchSummary {
            fetched: posts.len(),
            in_window: recent.len(),
            clean: records.len(),
            junk: junk.len(),
        };
        info!(
            fetched = summary.fetched,
            in_window = summary.in_window,
            clean = summary.clean,
            junk = summary.junk,
            "batch processed"
        );

        Ok(BatchOutput {
            records,
            junk,
            stats,
            summary,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use whale_core::JunkReason;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
    }

    fn hours_ago(h: i64) -> Timestamp {
        now() - Duration::hours(h)
    }

    #[test]
    fn test_window_is_strict() {
        let pipeline = Pipeline::default();
        let posts = vec![
            RawPost::new("a", hours_ago(1)),
            RawPost::new("b", hours_ago(24)),
            RawPost::new("c", hours_ago(30)),
        ];

        let recent = pipeline.filter_window(&posts, now());
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].text, "a");
    }

    #[test]
    fn test_process_counts() {
        let pipeline = Pipeline::default();
        let posts = vec![
            RawPost::new(
                "🚨 1,000 #BTC (27,000,000 USD) transferred from unknown wallet to #Binance",
                hours_ago(1),
            ),
            RawPost::new("something went wrong no numbers here", hours_ago(2)),
            RawPost::new("🔥 40,000,000 #USDC (40,000,000 USD) burned at USDC Treasury", hours_ago(3)),
            RawPost::new("5 BTC 150000 USD transferred from A to B", hours_ago(48)),
        ];

        let out = pipeline.process(&posts, now()).unwrap();

        assert_eq!(
            out.summary,
            BatchSummary {
                fetched: 4,
                in_window: 3,
                clean: 2,
                junk: 1,
            }
        );
        assert_eq!(out.records[0].to.as_deref(), Some("Binance"));
        assert_eq!(out.records[1].to, None);
        assert_eq!(out.junk[0].timestamp, hours_ago(2));
        assert_eq!(out.stats.non_numeric_quantity, 1);
    }

    #[test]
    fn test_prepare() {
        let candidate = Pipeline::default().prepare("1 BTC 2 USD sent from a b to c");
        assert_eq!(candidate.tokens.len(), 10);
        assert_eq!(candidate.fields, vec!["1", "BTC", "2", "USD", "sent", "a b", "c"]);
    }

    #[test]
    fn test_custom_window() {
        let pipeline = Pipeline::with_parts(
            MarkerExtractor::default(),
            RecordValidator::default(),
            Duration::hours(72),
        );
        let posts = vec![RawPost::new("x", hours_ago(48))];
        assert_eq!(pipeline.window(), Duration::hours(72));
        assert_eq!(pipeline.filter_window(&posts, now()).len(), 1);
    }

    #[test]
    fn test_loose_parser_bounds_keep_short_posts_in_junk() {
        // Config built without validate().
        let mut config = Config::default();
        config.parser.min_fields = 5;
        let posts = vec![RawPost::new("1 BTC 2 USD moved", hours_ago(1))];

        let out = Pipeline::new(&config).process(&posts, now()).unwrap();

        assert!(out.records.is_empty());
        assert_eq!(out.junk.len(), 1);
        assert_eq!(out.junk[0].reason, JunkReason::FieldCount(5));
        assert_eq!(out.junk[0].timestamp, hours_ago(1));
    }
}
