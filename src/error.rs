//! Error types for the ktweb-minutes crate

use thiserror::Error;

use crate::crawler::CrawlError;
use crate::parse::ParseError;

/// Result type for ktweb-minutes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ktweb-minutes operations
#[derive(Debug, Error)]
pub enum Error {
    /// Crawling or mirroring error
    #[error("crawl error: {0}")]
    Crawl(#[from] CrawlError),

    /// Mirror parsing error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error outside the crawl and parse paths
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
