//! One capture run: fetch, parse, persist, report.

use tracing::info;
use whale_core::{BatchSummary, Config, Result, Timestamp};
use whale_ingestion::Pipeline;
use whale_io::{FeedSource, TabularSink};

/// Fetch the configured account, run the pipeline and persist both
/// streams.
///
/// The records table is always written; the junk table only when the
/// batch produced junk.
pub fn run_batch(
    feed: &dyn FeedSource,
    sink: &dyn TabularSink,
    config: &Config,
    now: Timestamp,
) -> Result<BatchSummary> {
    let posts = feed.fetch(&config.feed.account, config.feed.max_posts)?;
    info!(account = %config.feed.account, fetched = posts.len(), "fetched posts");

    let output = Pipeline::new(config).process(&posts, now)?;

    sink.append_records(&output.records)?;
    if output.junk.is_empty() {
        info!("no junk posts in this batch");
    } else {
        sink.append_junk(&output.junk)?;
    }

    Ok(output.summary)
}
