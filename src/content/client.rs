use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::batch::{ContentBatch, Granularity};
use super::types::{CollectionRecord, ContentItem, SectionRecord, SubSectionRecord};
use crate::util::{validate_api_base_url, UrlValidationError};

/// Responses above this size are rejected before decoding.
const MAX_RESPONSE_SIZE: usize = 20 * 1024 * 1024; // 20MB

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
/// Backoff stops doubling after this many retries (64x the base delay).
const MAX_BACKOFF_EXPONENT: u32 = 6;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Content API rejected the credentials (status {0})")]
    Unauthorized(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid content API URL: {0}")]
    InvalidBaseUrl(#[from] UrlValidationError),
}

impl ContentError {
    /// Returns true if this error is transient and the request should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ContentError::Timeout(_) | ContentError::Network(_) => true,
            ContentError::HttpStatus(status) => *status >= 500 || *status == 429,
            ContentError::Unauthorized(_)
            | ContentError::ResponseTooLarge(_)
            | ContentError::InvalidUtf8
            | ContentError::Decode(_)
            | ContentError::InvalidBaseUrl(_) => false,
        }
    }
}

/// Collection endpoints of the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Articles,
    Videos,
    Collections,
    SubSections,
    Sections,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Articles => "api/articles",
            Self::Videos => "api/videos",
            Self::Collections => "api/collections",
            Self::SubSections => "api/sub-sections",
            Self::Sections => "api/sections",
        }
    }
}

/// Every list endpoint wraps its records in `{"data": [...]}`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
}

/// Read-only client for the content API.
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ContentClient {
    /// Create a client for `base_url`.
    ///
    /// The base URL must be HTTPS; plain HTTP is accepted for localhost only so
    /// the bearer token never travels in clear text to a remote host.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        token: Option<SecretString>,
    ) -> Result<Self, ContentError> {
        let base_url = validate_api_base_url(base_url)?;
        if base_url.scheme() == "http" {
            tracing::warn!(base_url = %base_url, "Using non-HTTPS content API (localhost only)");
        }
        Ok(Self {
            http,
            base_url,
            token,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry budget. Delays double per attempt from `base_delay`.
    pub fn with_retry(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch every record kind needed for `granularity`.
    ///
    /// For `Items`, articles and videos are requested concurrently and merged,
    /// articles first.
    pub async fn fetch(&self, granularity: Granularity) -> Result<ContentBatch, ContentError> {
        let batch = match granularity {
            Granularity::Items => {
                let (mut articles, videos) =
                    futures::future::try_join(self.fetch_articles(), self.fetch_videos()).await?;
                articles.extend(videos);
                ContentBatch::Items(articles)
            }
            Granularity::Collections => ContentBatch::Collections(self.fetch_collections().await?),
            Granularity::SubSections => ContentBatch::SubSections(self.fetch_sub_sections().await?),
            Granularity::Sections => ContentBatch::Sections(self.fetch_sections().await?),
        };
        tracing::info!(
            granularity = granularity.name(),
            records = batch.len(),
            "Fetched content"
        );
        Ok(batch)
    }

    pub async fn fetch_articles(&self) -> Result<Vec<ContentItem>, ContentError> {
        self.fetch_records(Endpoint::Articles).await
    }

    pub async fn fetch_videos(&self) -> Result<Vec<ContentItem>, ContentError> {
        let videos: Vec<ContentItem> = self.fetch_records(Endpoint::Videos).await?;
        Ok(videos.into_iter().map(ContentItem::into_video).collect())
    }

    pub async fn fetch_collections(&self) -> Result<Vec<CollectionRecord>, ContentError> {
        self.fetch_records(Endpoint::Collections).await
    }

    pub async fn fetch_sub_sections(&self) -> Result<Vec<SubSectionRecord>, ContentError> {
        self.fetch_records(Endpoint::SubSections).await
    }

    pub async fn fetch_sections(&self) -> Result<Vec<SectionRecord>, ContentError> {
        self.fetch_records(Endpoint::Sections).await
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, ContentError> {
        let mut url = self
            .base_url
            .join(endpoint.path())
            .map_err(|e| ContentError::InvalidBaseUrl(e.into()))?;
        url.query_pairs_mut().append_pair("populate", "deep");
        Ok(url)
    }

    /// Fetch and decode one endpoint, retrying transient failures with
    /// exponential backoff (1x, 2x, 4x the base delay).
    async fn fetch_records<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> Result<Vec<T>, ContentError> {
        let url = self.endpoint_url(endpoint)?;
        let mut retry_count = 0;

        loop {
            match self.fetch_once(&url).await {
                Ok(body) => {
                    let envelope: Envelope<T> = serde_json::from_str(&body)?;
                    tracing::debug!(
                        endpoint = endpoint.path(),
                        records = envelope.data.len(),
                        "Decoded content records"
                    );
                    return Ok(envelope.data);
                }
                Err(e) if e.is_retryable() && retry_count < self.max_retries => {
                    let delay = backoff_delay(self.retry_base_delay, retry_count);
                    tracing::warn!(
                        error = %e,
                        endpoint = endpoint.path(),
                        retry = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying content fetch after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, ContentError> {
        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.token {
            request = request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ContentError::Timeout(self.timeout.as_secs()))?
            .map_err(ContentError::Network)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ContentError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ContentError::HttpStatus(status.as_u16()));
        }

        read_limited_text(response, MAX_RESPONSE_SIZE).await
    }
}

/// Delay before retry number `retry_count + 1`: the base delay doubled per
/// attempt, capped at `MAX_BACKOFF_EXPONENT` doublings.
fn backoff_delay(base: Duration, retry_count: u32) -> Duration {
    base.saturating_mul(1u32 << retry_count.min(MAX_BACKOFF_EXPONENT))
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, ContentError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ContentError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ContentError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ContentError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| ContentError::InvalidUtf8)
}
