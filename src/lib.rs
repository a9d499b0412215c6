//! # ktweb-minutes
//!
//! This crate mirrors and structurally parses municipal governing-body
//! meeting minutes published as static, frame-based HTML exports (the KTWeb
//! publishing system: one cover page plus one page per agenda item, per
//! meeting). It covers the crawl-and-extract pipeline only; serving or
//! persisting the extracted records is left to external consumers.
//!
//! ## Features
//!
//! - Rate-limited, resumable fetching into a local page mirror
//! - Storage-reducing HTML sanitization with an attribute allow-list
//! - Two-level link discovery (policymaker listing → meeting document
//!   index → agenda item frames)
//! - Heuristic structured-text parsing of cover pages and agenda items
//!   into normalized [`meeting::MeetingRecord`] values
//! - Async API with Tokio
//! - Robust error handling and logging
//!
//! ## Example
//!
//! ```rust,no_run
//! use ktweb_minutes::crawler::{Crawler, CrawlerConfig};
//! use ktweb_minutes::meeting;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlerConfig::builder()
//!         .mirror_root("mirror".into())
//!         .fetch_interval_ms(1000)
//!         .build();
//!
//!     let listing_url = url::Url::parse("http://www3.example.fi/paatokset/karltk.htm")?;
//!     let mut crawler = Crawler::new(config)?;
//!     for dir in crawler.crawl(&listing_url).await? {
//!         let record = meeting::parse_meetingdoc(&dir)?;
//!         println!("{} {}", record.start_datetime, record.origin_id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod crawler;
mod error;
pub mod meeting;
pub mod parse;
pub mod sanitize;

pub use error::Error;

/// Re-export of the crate error types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
