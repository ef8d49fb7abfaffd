//! Alert output formatting

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::logic::RateHit;

/// One alert line as emitted in JSON mode
#[derive(Debug, Serialize)]
pub struct AlertLine<'a> {
    pub url: String,
    pub process_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<&'a str>,
    pub rate: f64,
    pub netconn_count: u64,
    pub runtime_secs: Option<u64>,
}

/// Full console link for a hit
pub fn analyze_url(server_url: &str, hit: &RateHit) -> String {
    format!("{}/{}", server_url, hit.analyze_fragment())
}

/// `<url>|<process_name>|<rate>` with four decimals
pub fn format_text(server_url: &str, hit: &RateHit) -> String {
    format!(
        "{}|{}|{:.4}",
        analyze_url(server_url, hit),
        hit.process_name,
        hit.rate
    )
}

pub fn format_json(server_url: &str, hit: &RateHit) -> Result<String, serde_json::Error> {
    serde_json::to_string(&AlertLine {
        url: analyze_url(server_url, hit),
        process_name: &hit.process_name,
        hostname: hit.hostname.as_deref(),
        rate: hit.rate,
        netconn_count: hit.netconn_count,
        runtime_secs: hit.runtime.measured(),
    })
}

pub fn format_hit(format: OutputFormat, server_url: &str, hit: &RateHit) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(format_text(server_url, hit)),
        OutputFormat::Json => format_json(server_url, hit),
    }
}
