//! whale-tracker entry point.
//!
//! Reads recent posts of a whale-alert account, splits them into clean
//! transaction records and junk, and appends both to CSV tables.

mod runner;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use whale_core::Config;
use whale_io::{CsvSink, JsonFileFeed};

/// Capture whale-alert transaction posts into CSV tables
#[derive(Parser, Debug)]
#[command(name = "whale-tracker", version, about)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// JSON export of posts to read
    #[arg(short = 'f', long = "feed")]
    feed: PathBuf,

    /// Directory holding the output tables
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Account whose posts are captured
    #[arg(short = 'a', long = "account")]
    account: Option<String>,

    /// Only capture posts newer than this many hours
    #[arg(long = "window-hours")]
    window_hours: Option<u32>,

    /// Maximum number of most recent posts to read
    #[arg(long = "max-posts")]
    max_posts: Option<usize>,
}

impl Cli {
    /// Load the configuration file, then apply command-line overrides.
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.storage.output_dir = dir.clone();
        }
        if let Some(account) = &self.account {
            config.feed.account = account.clone();
        }
        if let Some(hours) = self.window_hours {
            config.feed.window_hours = hours;
        }
        if let Some(max_posts) = self.max_posts {
            config.feed.max_posts = max_posts;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    tracing::info!(
        account = %config.feed.account,
        window_hours = config.feed.window_hours,
        output_dir = %config.storage.output_dir.display(),
        "starting capture"
    );

    let feed = JsonFileFeed::new(&cli.feed);
    let sink = CsvSink::from_config(&config.storage);

    let summary = runner::run_batch(&feed, &sink, &config, chrono::Utc::now())
        .context("capture run failed")?;

    println!("{} posts captured successfully!", summary.clean);
    if summary.junk > 0 {
        println!("{} junk posts kept for review", summary.junk);
    } else {
        println!("No junk posts today");
    }

    Ok(())
}
