//! In-memory Graph API fake
//!
//! Answers by path, records every call, and tracks the peak number of
//! concurrent requests. Unknown paths answer `{"data": []}`.

use async_trait::async_trait;
use madx_api::graph::{GraphApi, GraphError, GraphOutcome, ImageUpload};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get {
        path: String,
        params: Vec<(String, String)>,
    },
    Form {
        path: String,
        fields: Vec<(String, String)>,
    },
    Json {
        path: String,
        body: Value,
    },
    Multipart {
        path: String,
        filename: String,
        content_type: String,
        bytes: usize,
    },
}

impl RecordedCall {
    pub fn path(&self) -> &str {
        match self {
            RecordedCall::Get { path, .. }
            | RecordedCall::Form { path, .. }
            | RecordedCall::Json { path, .. }
            | RecordedCall::Multipart { path, .. } => path,
        }
    }
}

#[derive(Default)]
pub struct MockGraph {
    responses: HashMap<String, GraphOutcome>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with a JSON body
    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    /// Answer `path` with a collection `{"data": items}`
    pub fn with_data(self, path: &str, items: Value) -> Self {
        self.with(path, json!({ "data": items }))
    }

    pub fn with_error(mut self, path: &str, error: GraphError) -> Self {
        self.responses.insert(path.to_string(), Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    pub fn with_path_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(&self, call: RecordedCall) -> GraphOutcome {
        let path = call.path().to_string();
        self.calls.lock().unwrap().push(call);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&path).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.responses
            .get(&path)
            .cloned()
            .unwrap_or_else(|| Ok(json!({ "data": [] })))
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl GraphApi for MockGraph {
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> GraphOutcome {
        self.answer(RecordedCall::Get {
            path: path.to_string(),
            params: owned(params),
        })
        .await
    }

    async fn post_form(&self, path: &str, fields: Vec<(String, String)>) -> GraphOutcome {
        self.answer(RecordedCall::Form {
            path: path.to_string(),
            fields,
        })
        .await
    }

    async fn post_json(&self, path: &str, body: Value) -> GraphOutcome {
        self.answer(RecordedCall::Json {
            path: path.to_string(),
            body,
        })
        .await
    }

    async fn post_multipart(&self, path: &str, upload: ImageUpload) -> GraphOutcome {
        self.answer(RecordedCall::Multipart {
            path: path.to_string(),
            filename: upload.filename,
            content_type: upload.content_type,
            bytes: upload.bytes.len(),
        })
        .await
    }
}

/// One account `1` → campaign `c1` → ad-set `s1` → ad `a1`
pub fn scenario_graph() -> MockGraph {
    MockGraph::new()
        .with_data("me/adaccounts", json!([{ "id": "1" }]))
        .with_data("1/campaigns", json!([{ "id": "c1" }]))
        .with_data(
            "c1/insights",
            json!([{ "spend": "123.45", "purchase_roas": [{ "value": "2.5" }] }]),
        )
        .with_data("c1/adsets", json!([{ "id": "s1" }]))
        .with_data("s1/ads", json!([{ "id": "a1" }]))
}
