//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every default can be overridden from the environment, and every
//! environment value can be overridden from the command line.

/// Minimum netconn count used by the server-side search gate
pub const DEFAULT_GT_COUNT: u64 = 100;

/// Connections per second above which a process is reported
pub const DEFAULT_CONN_RATE: f64 = 100.0;

/// Search page size (`rows` query parameter)
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// HTTP request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the API token
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Timestamp layout used by the process search API
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%6fZ";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get server URL from environment
pub fn get_server_url() -> Option<String> {
    non_empty_var("CB_SERVER_URL")
}

/// Get API token from environment
pub fn get_api_token() -> Option<String> {
    non_empty_var("CB_API_TOKEN")
}

/// Check if SSL verification is enabled
pub fn is_ssl_verify_enabled() -> bool {
    std::env::var("CB_SSL_VERIFY")
        .map(|s| parse_flag(&s))
        .unwrap_or(true)
}

/// Get netconn gate from environment or use default
pub fn get_gt_count() -> u64 {
    parse_or_default("NETCONN_GT_COUNT", std::env::var("NETCONN_GT_COUNT").ok(), DEFAULT_GT_COUNT)
}

/// Get alert rate from environment or use default
pub fn get_conn_rate() -> f64 {
    parse_or_default("NETCONN_RATE", std::env::var("NETCONN_RATE").ok(), DEFAULT_CONN_RATE)
}

/// Check if unknown-runtime processes should be skipped
pub fn is_skip_unknown() -> bool {
    std::env::var("NETCONN_SKIP_UNKNOWN")
        .map(|s| parse_flag(&s))
        .unwrap_or(false)
}

/// Get search page size from environment or use default
pub fn get_page_size() -> u32 {
    parse_or_default("CB_PAGE_SIZE", std::env::var("CB_PAGE_SIZE").ok(), DEFAULT_PAGE_SIZE)
}

/// Get request timeout from environment or use default
pub fn get_timeout_secs() -> u64 {
    parse_or_default("CB_TIMEOUT_SECS", std::env::var("CB_TIMEOUT_SECS").ok(), DEFAULT_TIMEOUT_SECS)
}

/// Parse an env value; an unparsable value falls back to the default with a warning
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}, using default {}", key, raw, default);
            default
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// "false", "0", "no" and "off" are false; anything else is true
fn parse_flag(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    !matches!(v.as_str(), "false" | "0" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" 0 "));
        assert!(!parse_flag("Off"));
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default("NETCONN_RATE", None, 100.0), 100.0);
        assert_eq!(parse_or_default("NETCONN_RATE", Some(" 12.5 ".to_string()), 100.0), 12.5);
        assert_eq!(parse_or_default("NETCONN_RATE", Some("abc".to_string()), 100.0), 100.0);
        assert_eq!(parse_or_default("CB_PAGE_SIZE", Some("-1".to_string()), 100u32), 100);
    }

    #[test]
    fn test_timestamp_format_matches_api() {
        let parsed = chrono::NaiveDateTime::parse_from_str(
            "2015-01-01T00:00:05.000000Z",
            TIMESTAMP_FORMAT,
        );
        assert!(parsed.is_ok());
    }
}
