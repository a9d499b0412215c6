//! # Mirror Crawler Module
//!
//! This module populates the local page mirror from one top-level
//! policymaker listing URL. It drives link discovery and the rate-limited
//! fetcher across the two-level document hierarchy: the listing page
//! enumerates meeting document index pages, and each index page enumerates
//! the meeting's agenda item frames.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: mirror location, request spacing, encodings
//! - `MirrorFetcher`: one idempotent, resumable GET per URL
//! - `Crawler`: the orchestration loop, tolerant of per-page failures
//! - `CrawlEvent`: structured progress/failure events for the caller
//!
//! A failed meeting document or agenda item fetch is logged, reported as an
//! event and skipped; only a failed listing fetch aborts the run, since
//! nothing can be discovered without it. Re-running the crawl is the retry
//! mechanism, made safe by mirror-based resumability.

pub mod config;
mod discover;
mod error;
mod fetch;

pub use config::{CrawlerConfig, CrawlerConfigBuilder, DEFAULT_INDEX_ENCODING, DEFAULT_PAGE_ENCODING};
pub use discover::{agendaitem_urls, meetingdoc_urls};
pub use error::CrawlError;
pub use fetch::{MirrorFetcher, MirrorPage};

use std::path::PathBuf;

use encoding_rs::Encoding;
use tokio::fs;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, warn};
use url::Url;

use crate::meeting::ORIGIN_URL_FILENAME;

/// Progress and failure events emitted during a crawl
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// The listing page was fetched and its meeting documents discovered
    ListingFetched {
        /// Listing page URL
        url: Url,
        /// Number of meeting documents the listing references
        meetingdocs: usize,
    },

    /// A meeting document and its agenda items were mirrored
    MeetingDocMirrored {
        /// Index page URL of the meeting document
        url: Url,
        /// Mirror directory of the meeting document
        dir: PathBuf,
    },

    /// A page fetch failed and was skipped
    FetchFailed {
        /// URL whose fetch failed
        url: Url,
        /// Human-readable cause
        reason: String,
    },
}

/// Crawler populating the local mirror from one listing URL
pub struct Crawler {
    fetcher: MirrorFetcher,
    page_encoding: &'static Encoding,
    index_encoding: &'static Encoding,
    events: Option<UnboundedSender<CrawlEvent>>,
}

impl Crawler {
    /// Create a crawler, resolving the configured encoding labels up front
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        let page_encoding = config.page_encoding()?;
        let index_encoding = config.index_encoding()?;
        Ok(Self {
            fetcher: MirrorFetcher::new(config),
            page_encoding,
            index_encoding,
            events: None,
        })
    }

    /// Attach a channel receiving [`CrawlEvent`]s as the crawl progresses
    pub fn with_events(mut self, events: UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    /// Crawl every meeting document reachable from `listing_url`.
    ///
    /// Returns the mirror directories of the meeting documents whose index
    /// page was mirrored. The listing fetch is fatal; any other failed page
    /// is logged and skipped.
    #[instrument(skip(self))]
    pub async fn crawl(&mut self, listing_url: &Url) -> Result<Vec<PathBuf>, CrawlError> {
        let listing = self.fetcher.fetch(listing_url, self.page_encoding).await?;
        let doc_urls = meetingdoc_urls(&listing.html, listing_url);
        info!(
            "listing {} references {} meeting documents",
            listing_url,
            doc_urls.len()
        );
        self.emit(CrawlEvent::ListingFetched {
            url: listing_url.clone(),
            meetingdocs: doc_urls.len(),
        });

        let mut dirs = Vec::with_capacity(doc_urls.len());
        for doc_url in doc_urls {
            match self.mirror_meetingdoc(&doc_url, listing_url).await {
                Ok(dir) => {
                    self.emit(CrawlEvent::MeetingDocMirrored {
                        url: doc_url,
                        dir: dir.clone(),
                    });
                    dirs.push(dir);
                }
                Err(err) => {
                    warn!("skipping meeting document {}: {}", doc_url, err);
                    self.emit(CrawlEvent::FetchFailed {
                        url: doc_url,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(dirs)
    }

    /// Mirror one meeting document: its index page, the origin sidecar and
    /// every discovered agenda item frame.
    async fn mirror_meetingdoc(
        &mut self,
        doc_url: &Url,
        listing_url: &Url,
    ) -> Result<PathBuf, CrawlError> {
        let index = self.fetcher.fetch(doc_url, self.index_encoding).await?;
        let dir = index
            .path
            .parent()
            .ok_or_else(|| CrawlError::MirrorLayout(doc_url.to_string()))?
            .to_path_buf();

        // The listing URL cannot be reconstructed from the mirror layout
        // later, so it is recorded next to the meeting document.
        fs::write(dir.join(ORIGIN_URL_FILENAME), format!("{listing_url}\n")).await?;

        for item_url in agendaitem_urls(&index.html, doc_url) {
            if let Err(err) = self.fetcher.fetch(&item_url, self.page_encoding).await {
                warn!("skipping agenda item {}: {}", item_url, err);
                self.emit(CrawlEvent::FetchFailed {
                    url: item_url,
                    reason: err.to_string(),
                });
            }
        }

        Ok(dir)
    }
}
