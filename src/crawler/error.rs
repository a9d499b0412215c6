//! Error types for the crawler module

use thiserror::Error;

/// Error type for crawl and mirror operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP-layer failure (connection error or non-2xx status)
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        /// URL whose fetch failed
        url: String,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// Configured encoding label is not a known character encoding
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    /// Mirror path derived from a URL has no usable parent directory
    #[error("cannot derive mirror directory for {0}")]
    MirrorLayout(String),

    /// Filesystem error while reading or writing the mirror
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
