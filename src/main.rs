//! # ktweb-minutes CLI
//!
//! Command-line interface for the mirror-and-parse pipeline:
//!
//! - `crawl`: mirror every meeting document reachable from one policymaker
//!   listing URL, respecting the configured request interval
//! - `parse`: read a mirror (or a single meeting document directory) and
//!   emit the normalized records as JSON on stdout, one record per line
//!
//! The two commands are independent: `parse` never touches the network, so
//! a mirror can be re-parsed at any time, and an interrupted crawl can be
//! resumed by running `crawl` again.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{instrument, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use ktweb_minutes::crawler::{
    CrawlEvent, Crawler, CrawlerConfig, DEFAULT_INDEX_ENCODING, DEFAULT_PAGE_ENCODING,
};
use ktweb_minutes::meeting;

#[derive(Parser)]
#[command(author, version, about = "Mirror and parse KTWeb-published meeting minutes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mirror a policymaker's meeting documents
    Crawl(CrawlArgs),

    /// Parse a mirror into normalized meeting records
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Policymaker listing URL to crawl
    #[arg(required = true)]
    url: String,

    /// Mirror root directory
    #[arg(short, long, default_value = "mirror")]
    root: PathBuf,

    /// Minimum interval between network requests in milliseconds
    #[arg(short, long, default_value = "1000")]
    interval: u64,

    /// Re-download pages already present in the mirror
    #[arg(short, long)]
    force: bool,

    /// Encoding of listing and agenda item pages
    #[arg(long, default_value = DEFAULT_PAGE_ENCODING)]
    page_encoding: String,

    /// Encoding of meeting document index pages
    #[arg(long, default_value = DEFAULT_INDEX_ENCODING)]
    index_encoding: String,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Mirror root, or a single meeting document directory
    #[arg(required = true)]
    root: PathBuf,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Crawl(args)) => {
            crawl_command(args).await?;
        }
        Some(Commands::Parse(args)) => {
            parse_command(args)?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["--help"]);
        }
    }

    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let listing_url = Url::parse(&args.url).context("invalid listing URL")?;

    let config = CrawlerConfig::builder()
        .mirror_root(args.root)
        .fetch_interval_ms(args.interval)
        .force_refetch(args.force)
        .page_encoding(args.page_encoding)
        .index_encoding(args.index_encoding)
        .build();

    let (events, mut receiver) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            match event {
                CrawlEvent::ListingFetched { meetingdocs, .. } => {
                    println!("{meetingdocs} meeting documents listed");
                }
                CrawlEvent::MeetingDocMirrored { dir, .. } => {
                    println!("{}", dir.display());
                }
                CrawlEvent::FetchFailed { url, reason } => {
                    eprintln!("fetch failed: {url}: {reason}");
                }
            }
        }
    });

    let mut crawler = Crawler::new(config)?.with_events(events);
    let dirs = crawler.crawl(&listing_url).await?;
    drop(crawler);
    printer.await?;

    println!("mirrored {} meeting documents", dirs.len());
    Ok(())
}

fn parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let dirs = if meeting::is_meetingdoc_dir(&args.root) {
        vec![args.root.clone()]
    } else {
        meeting::scan_mirror(&args.root)
    };

    for dir in dirs {
        match meeting::parse_meetingdoc(&dir) {
            Ok(record) => {
                let json = if args.pretty {
                    serde_json::to_string_pretty(&record)?
                } else {
                    serde_json::to_string(&record)?
                };
                println!("{json}");
            }
            Err(err) => warn!("skipping {}: {}", dir.display(), err),
        }
    }
    Ok(())
}
