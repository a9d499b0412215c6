//! Rate-limited, cache-aware page fetching into the local mirror
//!
//! One idempotent GET per URL: a page already present in the mirror is read
//! back without touching the network (unless the force flag is set), and
//! consecutive network requests are kept at least the configured interval
//! apart. Responses are decoded with the caller-supplied encoding, sanitized
//! and written under `<mirror root>/<url path>`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use encoding_rs::Encoding;
use reqwest::Client;
use tokio::fs;
use tracing::{debug, instrument};
use url::Url;

use crate::crawler::config::CrawlerConfig;
use crate::crawler::error::CrawlError;
use crate::sanitize::sanitize;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A sanitized page held in the local mirror
#[derive(Debug, Clone)]
pub struct MirrorPage {
    /// Source URL of the page
    pub url: Url,

    /// Path of the mirrored copy
    pub path: PathBuf,

    /// Sanitized page content
    pub html: String,
}

/// Fetcher writing sanitized pages into the local mirror
pub struct MirrorFetcher {
    /// The underlying reqwest client
    client: Client,

    config: CrawlerConfig,

    /// Time of the last network request; owned exclusively by this fetcher
    last_request: Option<Instant>,
}

impl MirrorFetcher {
    /// Create a new fetcher for the given configuration
    pub fn new(config: CrawlerConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            config,
            last_request: None,
        }
    }

    /// Access the fetcher configuration
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Local mirror path for a URL: the URL's path component appended to the
    /// mirror root. Deterministic and collision-free, so re-crawls skip or
    /// overwrite instead of duplicating.
    pub fn mirror_path(&self, url: &Url) -> PathBuf {
        self.config.mirror_root.join(url.path().trim_start_matches('/'))
    }

    /// Fetch one page, decoded with `encoding`, into the mirror.
    ///
    /// Returns the cached copy without network access when the mirror
    /// already holds the page and `force_refetch` is unset. On HTTP failure
    /// nothing is written.
    #[instrument(skip(self, encoding), level = "debug")]
    pub async fn fetch(
        &mut self,
        url: &Url,
        encoding: &'static Encoding,
    ) -> Result<MirrorPage, CrawlError> {
        let path = self.mirror_path(url);

        if !self.config.force_refetch && fs::try_exists(&path).await? {
            debug!("mirror hit for {}", url);
            let html = fs::read_to_string(&path).await?;
            return Ok(MirrorPage {
                url: url.clone(),
                path,
                html,
            });
        }

        self.wait_for_slot().await;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| CrawlError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let body = response.bytes().await.map_err(|source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        })?;

        let (decoded, _, _) = encoding.decode(&body);
        let html = sanitize(&decoded);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &html).await?;
        debug!("mirrored {} to {}", url, path.display());

        Ok(MirrorPage {
            url: url.clone(),
            path,
            html,
        })
    }

    /// Block until at least the configured interval has passed since the
    /// previous network request, then claim the slot.
    async fn wait_for_slot(&mut self) {
        if let Some(last) = self.last_request {
            let interval = self.config.fetch_interval();
            let elapsed = last.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
