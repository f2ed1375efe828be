//! Graph API HTTP client
//!
//! Wraps `reqwest` with the platform's conventions: token as a query
//! parameter for GET and JSON posts, token as a form field for form-encoded
//! and multipart posts. No call ever returns a raw transport error; every
//! exchange is folded into a [`GraphOutcome`].

use async_trait::async_trait;
use madx_common::config::{DEFAULT_GRAPH_BASE_URL, ENV_ACCESS_TOKEN};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::outcome::{classify_body, GraphError, GraphOutcome};
use super::GraphApi;

const USER_AGENT: &str = concat!("madx/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Explicit Graph API configuration
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Versioned API root, e.g. `https://graph.facebook.com/v23.0`
    pub base_url: String,
    /// Bearer credential; validated by [`GraphClient::new`]
    pub access_token: Option<String>,
    /// Page used in creative `object_story_spec`
    pub page_id: Option<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl GraphConfig {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            access_token,
            page_id: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_page_id(mut self, page_id: Option<String>) -> Self {
        self.page_id = page_id;
        self
    }
}

/// File part for `adimages` uploads
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Uploads are always declared as JPEG, whatever the file extension
    pub fn jpeg(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "image/jpeg".to_string(),
            bytes,
        }
    }
}

/// Graph API client bound to one credential
pub struct GraphClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GraphClient {
    /// Build a client, failing with `config_error` when the credential is
    /// missing or blank
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        let access_token = config
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GraphError::config(format!("{} is not set", ENV_ACCESS_TOKEN)))?
            .to_string();

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GraphError::config("Graph API base URL is empty"));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GraphError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            access_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Fold a send result into an outcome
///
/// The URL is never logged: it carries the credential in its query string.
async fn read_outcome(
    path: &str,
    sent: Result<reqwest::Response, reqwest::Error>,
) -> GraphOutcome {
    let response = match sent {
        Ok(response) => response,
        Err(e) => {
            let status = e.status().map(|s| s.as_u16());
            let e = e.without_url();
            warn!(path = %path, error = %e, "Graph request failed");
            return Err(GraphError::transport(
                format!("Graph request failed: {}", e),
                status,
            ));
        }
    };

    let status = response.status().as_u16();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            let e = e.without_url();
            warn!(path = %path, status, error = %e, "Failed to read Graph response body");
            return Err(GraphError::transport(
                format!("Failed to read Graph response: {}", e),
                Some(status),
            ));
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(body) => {
            debug!(path = %path, status, "Graph response received");
            classify_body(status, body)
        }
        Err(_) => {
            warn!(path = %path, status, bytes = bytes.len(), "Graph response was not JSON");
            Err(GraphError::non_json(status))
        }
    }
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> GraphOutcome {
        debug!(path = %path, "GET Graph API");
        let sent = self
            .http_client
            .get(self.url(path))
            .query(&[("access_token", self.access_token.as_str())])
            .query(params)
            .send()
            .await;
        read_outcome(path, sent).await
    }

    async fn post_form(&self, path: &str, mut fields: Vec<(String, String)>) -> GraphOutcome {
        if !fields.iter().any(|(key, _)| key == "access_token") {
            fields.push(("access_token".to_string(), self.access_token.clone()));
        }

        debug!(path = %path, fields = fields.len(), "POST form to Graph API");
        let sent = self
            .http_client
            .post(self.url(path))
            .form(&fields)
            .send()
            .await;
        read_outcome(path, sent).await
    }

    async fn post_json(&self, path: &str, body: Value) -> GraphOutcome {
        debug!(path = %path, "POST JSON to Graph API");
        let sent = self
            .http_client
            .post(self.url(path))
            .query(&[("access_token", self.access_token.as_str())])
            .json(&body)
            .send()
            .await;
        read_outcome(path, sent).await
    }

    async fn post_multipart(&self, path: &str, upload: ImageUpload) -> GraphOutcome {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| {
                GraphError::transport(format!("Invalid upload content type: {}", e), None)
            })?;

        let form = Form::new()
            .text("access_token", self.access_token.clone())
            .part("filename", part);

        debug!(path = %path, filename = %upload.filename, "POST multipart to Graph API");
        let sent = self
            .http_client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await;
        read_outcome(path, sent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::outcome::ErrorKind;

    #[test]
    fn test_missing_token_is_config_error() {
        let err = GraphClient::new(&GraphConfig::new(None)).err().unwrap();
        assert_eq!(err.kind, ErrorKind::ConfigError);
        assert_eq!(err.message, "META_ACCESS_TOKEN is not set");
    }

    #[test]
    fn test_blank_token_is_config_error() {
        let err = GraphClient::new(&GraphConfig::new(Some("  ".into()))).err().unwrap();
        assert_eq!(err.kind, ErrorKind::ConfigError);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = GraphConfig::new(Some("t".into())).with_base_url("http://localhost:1/v1/");
        let client = GraphClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1/v1");
        assert_eq!(client.url("/me/adaccounts"), "http://localhost:1/v1/me/adaccounts");
        assert_eq!(client.url("c1/adsets"), "http://localhost:1/v1/c1/adsets");
    }
}
