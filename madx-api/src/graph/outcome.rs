//! Tagged result type for Graph API exchanges
//!
//! Every outbound call resolves to a [`GraphOutcome`]: the parsed JSON body on
//! success, or a [`GraphError`] whose [`ErrorKind`] lets callers branch without
//! matching on message strings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Result of one Graph API exchange
pub type GraphOutcome = Result<Value, GraphError>;

/// Message used when a response body cannot be parsed as JSON
pub const NON_JSON_MESSAGE: &str = "Non-JSON response from Graph API";

/// Failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid local configuration (no request was sent)
    ConfigError,
    /// Send failure, unreadable body, non-JSON body, or deadline expiry
    TransportError,
    /// The platform answered with an `error` payload
    RemoteError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigError => "config_error",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::RemoteError => "remote_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured Graph API failure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct GraphError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status of the response, when one was received
    pub status_code: Option<u16>,
    /// Original response body for remote errors (passed through verbatim)
    pub body: Option<Value>,
}

impl GraphError {
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ConfigError,
            message: message.into(),
            status_code: None,
            body: None,
        }
    }

    pub fn transport(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            kind: ErrorKind::TransportError,
            message: message.into(),
            status_code,
            body: None,
        }
    }

    pub fn non_json(status_code: u16) -> Self {
        Self::transport(NON_JSON_MESSAGE, Some(status_code))
    }

    /// Remote error carrying the platform's body unchanged
    pub fn remote(status_code: u16, body: Value) -> Self {
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Graph API returned an error")
            .to_string();

        Self {
            kind: ErrorKind::RemoteError,
            message,
            status_code: Some(status_code),
            body: Some(body),
        }
    }

    /// Render as a Graph-shaped error object
    ///
    /// Remote errors return the platform body verbatim. Local failures use the
    /// same `{"error": {...}}` envelope with `type` set to the error kind.
    pub fn to_json(&self) -> Value {
        if let (ErrorKind::RemoteError, Some(body)) = (self.kind, &self.body) {
            return body.clone();
        }

        let mut error = json!({
            "message": self.message,
            "type": self.kind.as_str(),
        });
        if let Some(status) = self.status_code {
            error["status_code"] = json!(status);
        }
        json!({ "error": error })
    }
}

/// Classify a parsed response body
///
/// A top-level `error` object marks a remote error regardless of status;
/// anything else is a result, even on a non-2xx status.
pub fn classify_body(status_code: u16, body: Value) -> GraphOutcome {
    if body.get("error").map(Value::is_object).unwrap_or(false) {
        Err(GraphError::remote(status_code, body))
    } else {
        Ok(body)
    }
}
