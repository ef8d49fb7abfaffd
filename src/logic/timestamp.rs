//! Process timestamp parsing

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::constants::TIMESTAMP_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp missing")]
    Missing,

    #[error("malformed timestamp {value:?}: {reason}")]
    Malformed { value: String, reason: String },
}

/// Parse a `YYYY-MM-DDTHH:MM:SS.ffffffZ` timestamp.
///
/// Values are UTC; the trailing `Z` is matched literally. Empty strings
/// count as missing.
pub fn parse_timestamp(value: Option<&str>) -> Result<NaiveDateTime, TimestampError> {
    let value = match value.map(str::trim) {
        None | Some("") => return Err(TimestampError::Missing),
        Some(v) => v,
    };

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| TimestampError::Malformed {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Whole seconds between `start` and `last_update`, truncated toward zero.
pub fn measure_runtime(start: Option<&str>, last_update: Option<&str>) -> Result<i64, TimestampError> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(last_update)?;
    Ok((end - start).num_seconds())
}
