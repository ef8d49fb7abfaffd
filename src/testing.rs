//! Fake process search server for tests

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::constants::AUTH_HEADER;

pub const TOKEN: &str = "test-token";

pub const T0: &str = "2015-01-01T00:00:00.000000Z";
pub const T5: &str = "2015-01-01T00:00:05.000000Z";

#[derive(Clone, Default)]
pub struct FakeServer {
    pub records: Arc<Vec<Value>>,
    pub searches: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub event_lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeServer {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(records),
            ..Default::default()
        }
    }

    /// `count` processes at 100 conn/s each
    pub fn chatty(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| process(&format!("p{}", i), 500, Some(T0), Some(T5)))
                .collect(),
        )
    }

    pub fn search_starts(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .map(|r| r["start"].clone())
            .collect()
    }
}

/// Search result entry for segment 1 named `<id>.exe`
pub fn process(id: &str, netconns: u64, start: Option<&str>, last_update: Option<&str>) -> Value {
    json!({
        "id": id,
        "segment_id": 1,
        "process_name": format!("{}.exe", id),
        "netconn_count": netconns,
        "start": start,
        "last_update": last_update
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == TOKEN)
        .unwrap_or(false)
}

async fn search_handler(
    State(server): State<FakeServer>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    server.searches.lock().unwrap().push(params.clone());

    let rows: usize = params["rows"].parse().unwrap();
    let start: usize = params["start"].parse().unwrap();
    let total = server.records.len();
    let end = (start + rows).min(total);
    let results: Vec<Value> = server.records.get(start..end).unwrap_or_default().to_vec();

    Ok(Json(json!({
        "results": results,
        "total_results": total,
        "start": start
    })))
}

async fn events_handler(
    State(server): State<FakeServer>,
    headers: HeaderMap,
    Path((id, segment)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    server
        .event_lookups
        .lock()
        .unwrap()
        .push((id.clone(), segment.clone()));

    Ok(Json(json!({
        "process": {
            "id": id,
            "segment_id": segment,
            "process_name": "chatty.exe",
            "netconn_complete": ["a", "b", "c"]
        },
        "elapsed": 0.01
    })))
}

/// Serve on an ephemeral port and return the base URL
pub async fn spawn(server: FakeServer) -> String {
    let app = Router::new()
        .route("/api/v1/process", get(search_handler))
        .route("/api/v1/process/:id/:segment/event", get(events_handler))
        .route(
            "/broken/api/v1/process",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .with_state(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
