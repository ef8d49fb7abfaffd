//! Configuration module
//!
//! Defaults come from `constants`, are overridden by environment
//! variables (optionally loaded from `.env`), and finally by CLI flags.

use crate::cli::{Cli, OutputFormat};
use crate::client::{ClientConfig, ProcessQuery};
use crate::constants;
use crate::error::{AppResult, ConfigError};
use crate::logic::RateFilter;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server base URL, without trailing slash
    pub server_url: Option<String>,

    /// API token sent as `X-Auth-Token`
    pub api_token: Option<String>,

    /// Verify the server's TLS certificate
    pub ssl_verify: bool,

    /// Server-side gate: minimum netconn count
    pub gt_count: u64,

    /// Alert threshold in connections per second
    pub conn_rate: f64,

    /// Drop processes whose runtime cannot be determined
    pub skip_unknown: bool,

    /// Search page size
    pub rows: u32,

    /// Follow pagination past the first page
    pub all_pages: bool,

    /// Fetch events for each alerting process
    pub with_events: bool,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            api_token: None,
            ssl_verify: true,
            gt_count: constants::DEFAULT_GT_COUNT,
            conn_rate: constants::DEFAULT_CONN_RATE,
            skip_unknown: false,
            rows: constants::DEFAULT_PAGE_SIZE,
            all_pages: false,
            with_events: false,
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server_url: constants::get_server_url(),
            api_token: constants::get_api_token(),
            ssl_verify: constants::is_ssl_verify_enabled(),
            gt_count: constants::get_gt_count(),
            conn_rate: constants::get_conn_rate(),
            skip_unknown: constants::is_skip_unknown(),
            rows: constants::get_page_size(),
            timeout_secs: constants::get_timeout_secs(),
            ..Default::default()
        }
    }

    /// Overlay command-line flags
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.server_url {
            self.server_url = Some(url.clone());
        }
        if let Some(token) = &cli.api_token {
            self.api_token = Some(token.clone());
        }
        if cli.no_ssl_verify {
            self.ssl_verify = false;
        }
        if let Some(count) = cli.gt_count {
            self.gt_count = count;
        }
        if let Some(rate) = cli.conn_rate {
            self.conn_rate = rate;
        }
        if cli.skip_unknown {
            self.skip_unknown = true;
        }
        if let Some(rows) = cli.rows {
            self.rows = rows;
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = timeout;
        }
        self.all_pages |= cli.all_pages;
        self.with_events |= cli.with_events;
        self.format = cli.format;

        self.server_url = self
            .server_url
            .map(|url| url.trim().trim_end_matches('/').to_string());
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        let url = self
            .server_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingServerUrl)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidServerUrl(url.to_string()));
        }

        if self.api_token.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingApiToken);
        }

        if !self.conn_rate.is_finite() || self.conn_rate < 0.0 {
            return Err(ConfigError::InvalidRate(self.conn_rate));
        }

        if self.rows == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        Ok(())
    }

    pub fn client_config(&self) -> AppResult<ClientConfig> {
        self.validate()?;

        let server_url = self.server_url.clone().ok_or(ConfigError::MissingServerUrl)?;
        let api_token = self.api_token.clone().ok_or(ConfigError::MissingApiToken)?;

        Ok(ClientConfig {
            ssl_verify: self.ssl_verify,
            timeout_seconds: self.timeout_secs,
            ..ClientConfig::new(server_url, api_token)
        })
    }

    pub fn query(&self) -> ProcessQuery {
        ProcessQuery::netconn_at_least(self.gt_count)
    }

    pub fn rate_filter(&self) -> RateFilter {
        RateFilter::new(self.conn_rate, self.skip_unknown)
    }
}
