//! Wire models for the process search API

pub mod event;
pub mod process;

pub use event::EventRecord;
pub use process::{ProcessRecord, SearchPage};

use serde::{Deserialize, Deserializer};

/// Identifiers arrive either as JSON strings or JSON integers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    })
}
