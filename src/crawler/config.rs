//! # Crawler Configuration Module
//!
//! Configuration for the mirror crawler: where the local mirror lives, how
//! politely the source server is fetched, and which character encodings the
//! page types are decoded with. Uses a builder pattern for flexible
//! configuration.
//!
//! The encodings are configured as labels rather than hard-wired because the
//! publishing system's self-declared charsets cannot be trusted; the caller
//! decides what each page type is actually encoded in.

use std::path::PathBuf;
use std::time::Duration;

use encoding_rs::Encoding;

use crate::crawler::error::CrawlError;

/// Default encoding for listing and agenda item pages.
pub const DEFAULT_PAGE_ENCODING: &str = "windows-1252";

/// Default encoding for meeting document index pages.
pub const DEFAULT_INDEX_ENCODING: &str = "iso-8859-1";

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Root directory of the local page mirror
    pub mirror_root: PathBuf,

    /// Minimum interval between network requests in milliseconds
    pub fetch_interval_ms: u64,

    /// Whether to re-download pages already present in the mirror
    pub force_refetch: bool,

    /// Encoding label for listing and agenda item pages
    pub page_encoding: String,

    /// Encoding label for meeting document index pages
    pub index_encoding: String,

    /// User agent to use for requests
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            mirror_root: PathBuf::from("mirror"),
            fetch_interval_ms: 1000,
            force_refetch: false,
            page_encoding: DEFAULT_PAGE_ENCODING.to_string(),
            index_encoding: DEFAULT_INDEX_ENCODING.to_string(),
            user_agent: format!("ktweb-minutes/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the root directory of the local page mirror
    pub fn mirror_root(mut self, mirror_root: PathBuf) -> Self {
        self.config.mirror_root = mirror_root;
        self
    }

    /// Set the minimum interval between network requests in milliseconds
    pub fn fetch_interval_ms(mut self, fetch_interval_ms: u64) -> Self {
        self.config.fetch_interval_ms = fetch_interval_ms;
        self
    }

    /// Set whether to re-download pages already present in the mirror
    pub fn force_refetch(mut self, force_refetch: bool) -> Self {
        self.config.force_refetch = force_refetch;
        self
    }

    /// Set the encoding label for listing and agenda item pages
    pub fn page_encoding(mut self, page_encoding: impl Into<String>) -> Self {
        self.config.page_encoding = page_encoding.into();
        self
    }

    /// Set the encoding label for meeting document index pages
    pub fn index_encoding(mut self, index_encoding: impl Into<String>) -> Self {
        self.config.index_encoding = index_encoding.into();
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the minimum inter-request interval as a Duration
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }

    /// Resolve the listing/agenda-item page encoding
    pub fn page_encoding(&self) -> Result<&'static Encoding, CrawlError> {
        resolve_encoding(&self.page_encoding)
    }

    /// Resolve the index page encoding
    pub fn index_encoding(&self) -> Result<&'static Encoding, CrawlError> {
        resolve_encoding(&self.index_encoding)
    }
}

fn resolve_encoding(label: &str) -> Result<&'static Encoding, CrawlError> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| CrawlError::UnknownEncoding(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encodings_resolve() {
        let config = CrawlerConfig::default();
        assert_eq!(config.page_encoding().unwrap(), encoding_rs::WINDOWS_1252);
        // The WHATWG encoding standard folds iso-8859-1 into windows-1252.
        assert_eq!(config.index_encoding().unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_unknown_encoding_label() {
        let config = CrawlerConfig::builder().page_encoding("no-such-charset").build();
        match config.page_encoding() {
            Err(CrawlError::UnknownEncoding(label)) => assert_eq!(label, "no-such-charset"),
            other => panic!("expected UnknownEncoding, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_overrides() {
        let config = CrawlerConfig::builder()
            .mirror_root(PathBuf::from("/tmp/mirror"))
            .fetch_interval_ms(250)
            .force_refetch(true)
            .user_agent("test-agent")
            .build();

        assert_eq!(config.mirror_root, PathBuf::from("/tmp/mirror"));
        assert_eq!(config.fetch_interval(), Duration::from_millis(250));
        assert!(config.force_refetch);
        assert_eq!(config.user_agent, "test-agent");
    }
}
