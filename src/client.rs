//! Process Search API Client
//!
//! HTTP client for the server's process search and process events
//! endpoints. Every request is authenticated with the `X-Auth-Token`
//! header.

use std::time::Duration;

use crate::constants::{self, AUTH_HEADER};
use crate::error::ClientError;
use crate::models::{EventRecord, ProcessRecord, SearchPage};

/// Server connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub api_token: String,
    pub ssl_verify: bool,
    pub timeout_seconds: u64,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_token: api_token.into(),
            ssl_verify: true,
            timeout_seconds: constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Search query in the server's query language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessQuery(String);

impl ProcessQuery {
    /// Processes with at least `count` network connections
    pub fn netconn_at_least(count: u64) -> Self {
        Self(format!("netconn_count:[{} TO *]", count))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProcessQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// API client
pub struct CbClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl CbClient {
    /// Create new client
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(format!("netconn-rate/{}", constants::APP_VERSION));

        if !config.ssl_verify {
            tracing::warn!("SSL certificate verification disabled for {}", config.server_url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http_client = builder
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    /// Fetch one page of process search results
    pub async fn search_page(&self, query: &ProcessQuery, rows: u32, start: u64) -> Result<SearchPage, ClientError> {
        let url = format!("{}/api/v1/process", self.config.server_url);

        tracing::debug!("GET {} q={} rows={} start={}", url, query, rows, start);

        let response = self.http_client
            .get(&url)
            .header(AUTH_HEADER, &self.config.api_token)
            .query(&[
                ("q", query.as_str().to_string()),
                ("rows", rows.to_string()),
                ("start", start.to_string()),
            ])
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Paginated search; pages are only requested when asked for
    pub fn search(&self, query: ProcessQuery, rows: u32) -> ProcessSearch<'_> {
        ProcessSearch {
            client: self,
            query,
            rows,
            next_start: 0,
            follow_pages: true,
            done: false,
        }
    }

    /// Fetch the events document for one process segment
    pub async fn events(&self, id: &str, segment_id: &str) -> Result<EventRecord, ClientError> {
        let url = self.events_url(id, segment_id)?;

        tracing::debug!("GET {}", url);

        let response = self.http_client
            .get(url)
            .header(AUTH_HEADER, &self.config.api_token)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Ids are opaque, so each one is percent-encoded as a single path segment
    fn events_url(&self, id: &str, segment_id: &str) -> Result<reqwest::Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.config.server_url.clone());

        let mut url = reqwest::Url::parse(&self.config.server_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["api", "v1", "process", id, segment_id, "event"]);
        Ok(url)
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return response.json().await
                .map_err(|e| ClientError::ParseError(e.to_string()));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("Request failed ({}): {}", status, body);
        Err(ClientError::ServerError { status: status.as_u16(), body })
    }
}

/// Cursor over process search pages
pub struct ProcessSearch<'a> {
    client: &'a CbClient,
    query: ProcessQuery,
    rows: u32,
    next_start: u64,
    follow_pages: bool,
    done: bool,
}

impl<'a> ProcessSearch<'a> {
    /// Stop after the first page
    pub fn first_page_only(mut self) -> Self {
        self.follow_pages = false;
        self
    }

    /// Fetch the next page, or `None` once the result set is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<ProcessRecord>>, ClientError> {
        if self.done {
            return Ok(None);
        }

        let page = self.client
            .search_page(&self.query, self.rows, self.next_start)
            .await?;

        let fetched = page.results.len() as u64;
        self.next_start += fetched;

        tracing::debug!(
            "Fetched {} records at offset {} ({} total, elapsed {:?}s)",
            fetched,
            page.start,
            page.total_results,
            page.elapsed
        );

        if !self.follow_pages || fetched == 0 || self.next_start >= page.total_results {
            self.done = true;
        }

        if fetched == 0 {
            Ok(None)
        } else {
            Ok(Some(page.results))
        }
    }
}
