//! Network Connection Rate Filter
//!
//! Computes connections per second for each process record and keeps
//! the ones above the alert rate.
//!
//! Runtime is `last_update - start` in whole seconds. Records whose
//! timestamps are missing or unparsable either count as running for one
//! second or are dropped, depending on `skip_unknown`. Runtimes under one
//! second are clamped to one so the rate is always finite; a last update
//! earlier than the start never alerts.
//!
//! The filter is a lazy adapter: it pulls one record at a time and keeps
//! the input order.

use super::timestamp::measure_runtime;
use crate::models::ProcessRecord;

/// Runtime used as the rate denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    /// Measured from the record's timestamps, at least one second
    Measured(u64),
    /// Timestamps unusable, counted as one second
    Unknown,
}

impl Runtime {
    pub fn seconds(&self) -> u64 {
        match self {
            Runtime::Measured(secs) => *secs,
            Runtime::Unknown => 1,
        }
    }

    pub fn measured(&self) -> Option<u64> {
        match self {
            Runtime::Measured(secs) => Some(*secs),
            Runtime::Unknown => None,
        }
    }
}

/// A record whose rate exceeded the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct RateHit {
    pub id: String,
    pub segment_id: String,
    pub process_name: String,
    pub hostname: Option<String>,
    pub netconn_count: u64,
    pub runtime: Runtime,
    pub rate: f64,
}

impl RateHit {
    /// Console fragment for this process segment, appended to the server URL
    pub fn analyze_fragment(&self) -> String {
        format!("#analyze/{}/{}", self.id, self.segment_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateFilter {
    conn_rate: f64,
    skip_unknown: bool,
}

impl RateFilter {
    pub fn new(conn_rate: f64, skip_unknown: bool) -> Self {
        Self { conn_rate, skip_unknown }
    }

    pub fn conn_rate(&self) -> f64 {
        self.conn_rate
    }

    pub fn skip_unknown(&self) -> bool {
        self.skip_unknown
    }

    /// Runtime for a record, or `None` when the record must be skipped.
    ///
    /// A `last_update` before `start` gives a negative rate, which never
    /// exceeds a non-negative threshold, so such records are skipped too.
    pub fn runtime(&self, record: &ProcessRecord) -> Option<Runtime> {
        match measure_runtime(record.start.as_deref(), record.last_update.as_deref()) {
            Ok(secs) if secs < 0 => {
                tracing::debug!(
                    "Skipping {}/{} ({}): last update {}s before start",
                    record.id,
                    record.segment_id,
                    record.process_name,
                    -secs
                );
                None
            }
            Ok(secs) => Some(Runtime::Measured(secs.max(1) as u64)),
            Err(e) if self.skip_unknown => {
                tracing::debug!(
                    "Skipping {}/{} ({}): {}",
                    record.id,
                    record.segment_id,
                    record.process_name,
                    e
                );
                None
            }
            Err(_) => Some(Runtime::Unknown),
        }
    }

    /// Decide a single record
    pub fn evaluate(&self, record: &ProcessRecord) -> Option<RateHit> {
        let runtime = self.runtime(record)?;
        let rate = record.netconn_count as f64 / runtime.seconds() as f64;

        if rate > self.conn_rate {
            Some(RateHit {
                id: record.id.clone(),
                segment_id: record.segment_id.clone(),
                process_name: record.process_name.clone(),
                hostname: record.hostname.clone(),
                netconn_count: record.netconn_count,
                runtime,
                rate,
            })
        } else {
            None
        }
    }

    /// Lazily filter a sequence of records, preserving order
    pub fn filter<'a, I>(&'a self, records: I) -> impl Iterator<Item = RateHit> + 'a
    where
        I: IntoIterator<Item = ProcessRecord>,
        I::IntoIter: 'a,
    {
        records.into_iter().filter_map(move |record| self.evaluate(&record))
    }
}

impl Default for RateFilter {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_CONN_RATE, false)
    }
}
