//! Watch endpoint client
//!
//! Issues `GET {base}/watch?episodeId=..&mediaId=..&server=..` and returns
//! the raw body for the extractor.

use crate::error::{Error, Result};
use crate::types::MediaRequest;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// FlixHQ provider on the public consumet API
pub const DEFAULT_BASE_URL: &str = "https://api.consumet.org/movies/flixhq";

/// Upper bound on a single watch request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the watch endpoint
#[derive(Debug, Clone)]
pub struct WatchClient {
    client: Client,
    base_url: Url,
}

impl WatchClient {
    /// Create a client with its own connection pool and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lobster/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(format!("building HTTP client: {}", e)))?;
        Self::with_client(base_url, client)
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid API base URL '{}'", base_url)));
        }
        Ok(Self { client, base_url })
    }

    /// Build the watch URL for `request`
    pub fn watch_url(&self, request: &MediaRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("watch");
        }
        url.query_pairs_mut()
            .append_pair("episodeId", &request.episode_id)
            .append_pair("mediaId", &request.media_id)
            .append_pair("server", &request.server);
        url
    }

    /// Fetch the raw watch payload
    #[instrument(skip(self), fields(episode = %request.episode_id, server = %request.server))]
    pub async fn fetch(&self, request: &MediaRequest) -> Result<Bytes> {
        let url = self.watch_url(request);
        info!(url = %url, "Fetching sources");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        let body = response.bytes().await.map_err(|e| request_error(&url, e))?;
        debug!(bytes = body.len(), "Sources fetched");

        Ok(body)
    }
}

fn request_error(url: &Url, source: reqwest::Error) -> Error {
    if source.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
        }
    } else {
        Error::Http {
            url: url.to_string(),
            source,
        }
    }
}
