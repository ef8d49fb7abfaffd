//! Process events model

use serde::Deserialize;

use super::string_or_number;

/// Events document for one process segment.
///
/// Event lists are pipe-delimited strings on the wire; they are kept
/// opaque here since only their counts are reported.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub process: ProcessEvents,
    #[serde(default)]
    pub elapsed: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessEvents {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub segment_id: String,
    #[serde(default)]
    pub process_name: String,
    #[serde(default)]
    pub netconn_complete: Vec<String>,
    #[serde(default)]
    pub filemod_complete: Vec<String>,
    #[serde(default)]
    pub regmod_complete: Vec<String>,
    #[serde(default)]
    pub modload_complete: Vec<String>,
    #[serde(default)]
    pub childproc_complete: Vec<String>,
}

/// Per-kind event counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub netconns: usize,
    pub filemods: usize,
    pub regmods: usize,
    pub modloads: usize,
    pub childprocs: usize,
}

impl EventRecord {
    pub fn counts(&self) -> EventCounts {
        let p = &self.process;
        EventCounts {
            netconns: p.netconn_complete.len(),
            filemods: p.filemod_complete.len(),
            regmods: p.regmod_complete.len(),
            modloads: p.modload_complete.len(),
            childprocs: p.childproc_complete.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_counts() {
        let body = r#"{
            "process": {
                "id": "p1",
                "segment_id": 1,
                "process_name": "curl.exe",
                "netconn_complete": [
                    "2015-01-01 00:00:01.000000|-1062731775|443|6|example.com|true",
                    "2015-01-01 00:00:02.000000|-1062731775|443|6|example.com|true"
                ],
                "modload_complete": ["2015-01-01 00:00:00.000000|abc|c:\\windows\\ntdll.dll"]
            },
            "elapsed": 0.01
        }"#;

        let events: EventRecord = serde_json::from_str(body).unwrap();
        assert_eq!(events.process.segment_id, "1");
        assert_eq!(
            events.counts(),
            EventCounts { netconns: 2, modloads: 1, ..Default::default() }
        );
    }
}
