//! Process record model

use serde::Deserialize;

use super::string_or_number;

/// One process instance as returned by the process search endpoint.
///
/// Timestamps are kept as raw text: the server sometimes omits them or
/// returns values that do not parse, and deciding what to do about that
/// belongs to the rate filter, not to deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub segment_id: String,
    #[serde(default)]
    pub process_name: String,
    #[serde(default)]
    pub netconn_count: u64,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

#[cfg(test)]
impl ProcessRecord {
    pub fn new(id: impl Into<String>, segment_id: impl Into<String>, process_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            segment_id: segment_id.into(),
            process_name: process_name.into(),
            netconn_count: 0,
            start: None,
            last_update: None,
            hostname: None,
        }
    }

    pub fn with_netconns(mut self, count: u64) -> Self {
        self.netconn_count = count;
        self
    }

    pub fn with_times(mut self, start: Option<&str>, last_update: Option<&str>) -> Self {
        self.start = start.map(str::to_string);
        self.last_update = last_update.map(str::to_string);
        self
    }
}

/// One page of process search results
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<ProcessRecord>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub elapsed: Option<f64>,
}
