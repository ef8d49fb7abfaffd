//! CLI argument parsing

use clap::{Parser, ValueEnum};

/// Output format for alert lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `<url>|<process_name>|<rate>` (default)
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "netconn-rate")]
#[command(version)]
#[command(about = "High avg. netconn/second alert", long_about = None)]
pub struct Cli {
    /// Server URL, e.g. http://127.0.0.1 (default: CB_SERVER_URL)
    #[arg(short = 'c', long = "cburl", value_name = "SERVER_URL")]
    pub server_url: Option<String>,

    /// API token for the server (default: CB_API_TOKEN)
    #[arg(short = 'a', long = "apitoken", value_name = "TOKEN")]
    pub api_token: Option<String>,

    /// Do not verify the server SSL certificate
    #[arg(short = 'n', long = "no-ssl-verify")]
    pub no_ssl_verify: bool,

    /// Only search processes with at least this many network connections
    #[arg(short = 'g', long = "gt-count", value_name = "GT_COUNT")]
    pub gt_count: Option<u64>,

    /// Alert on processes with more than this many connections per second
    #[arg(short = 'r', long = "rate", value_name = "CONN_RATE")]
    pub conn_rate: Option<f64>,

    /// Skip processes with unknown start or last update
    #[arg(short = 's', long = "skip-unknown", alias = "skip_unknown")]
    pub skip_unknown: bool,

    /// Search page size
    #[arg(long = "rows", value_name = "ROWS")]
    pub rows: Option<u32>,

    /// Keep requesting pages until the result set is exhausted
    #[arg(long = "all-pages")]
    pub all_pages: bool,

    /// Fetch the events of each alerting process and log their counts
    #[arg(long = "with-events")]
    pub with_events: bool,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["netconn-rate"]);
        assert!(cli.server_url.is_none());
        assert!(cli.api_token.is_none());
        assert!(!cli.no_ssl_verify);
        assert!(!cli.skip_unknown);
        assert!(!cli.all_pages);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "netconn-rate", "-c", "https://cb.local", "-a", "abc", "-n", "-g", "250", "-r", "12.5", "-s",
        ]);
        assert_eq!(cli.server_url.as_deref(), Some("https://cb.local"));
        assert_eq!(cli.api_token.as_deref(), Some("abc"));
        assert!(cli.no_ssl_verify);
        assert_eq!(cli.gt_count, Some(250));
        assert_eq!(cli.conn_rate, Some(12.5));
        assert!(cli.skip_unknown);
    }

    #[test]
    fn test_cli_skip_unknown_alias() {
        let cli = Cli::parse_from(["netconn-rate", "--skip_unknown"]);
        assert!(cli.skip_unknown);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "netconn-rate", "--rows", "50", "--all-pages", "--with-events", "--timeout", "5", "--format", "json",
        ]);
        assert_eq!(cli.rows, Some(50));
        assert!(cli.all_pages);
        assert!(cli.with_events);
        assert_eq!(cli.timeout_secs, Some(5));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_bad_rate() {
        assert!(Cli::try_parse_from(["netconn-rate", "-r", "fast"]).is_err());
    }
}
