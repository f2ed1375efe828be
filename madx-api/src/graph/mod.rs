//! Graph API access
//!
//! [`GraphApi`] is the seam between the service logic (tree traversal,
//! provisioning) and the wire. [`GraphClient`] is the `reqwest`
//! implementation; tests substitute in-memory fakes.

pub mod client;
pub mod outcome;

pub use client::{GraphClient, GraphConfig, ImageUpload};
pub use outcome::{classify_body, ErrorKind, GraphError, GraphOutcome};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Request primitives used against the advertising platform
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// GET `{base}/{path}` with extra query parameters
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> GraphOutcome;

    /// POST form-encoded fields; credential appended as a form field
    async fn post_form(&self, path: &str, fields: Vec<(String, String)>) -> GraphOutcome;

    /// POST a JSON body; credential sent as a query parameter
    async fn post_json(&self, path: &str, body: Value) -> GraphOutcome;

    /// POST multipart with one file part; credential sent as a form field
    async fn post_multipart(&self, path: &str, upload: ImageUpload) -> GraphOutcome;
}

/// Graph access as resolved at startup
///
/// An unconfigured handle keeps the construction error so every caller
/// reports the same `config_error` without touching the network.
#[derive(Clone)]
pub enum GraphHandle {
    Ready(Arc<dyn GraphApi>),
    Unconfigured(GraphError),
}

impl GraphHandle {
    /// Build the `reqwest` client from configuration
    pub fn connect(config: &GraphConfig) -> Self {
        match GraphClient::new(config) {
            Ok(client) => {
                info!(base_url = %client.base_url(), "Graph API client configured");
                GraphHandle::Ready(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Graph API client not configured; Graph endpoints will report config_error");
                GraphHandle::Unconfigured(e)
            }
        }
    }

    pub fn from_api(api: Arc<dyn GraphApi>) -> Self {
        GraphHandle::Ready(api)
    }

    pub fn api(&self) -> Result<Arc<dyn GraphApi>, GraphError> {
        match self {
            GraphHandle::Ready(api) => Ok(api.clone()),
            GraphHandle::Unconfigured(err) => Err(err.clone()),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, GraphHandle::Ready(_))
    }
}
