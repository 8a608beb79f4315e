//! Transport for executing rendered operations.
//!
//! This module provides a trait-based transport so the client can be driven
//! by a real HTTP endpoint or by a recording mock:
//!
//! - [`HttpTransport`] posts to a GraphQL endpoint with reqwest
//! - [`mock::MockTransport`] replays queued responses (behind `test-utils`)
//!
//! # Example
//!
//! ```ignore
//! use graphql_test_client::transport::{HttpTransport, Transport, TransportRequest};
//!
//! let transport = HttpTransport::new("http://localhost:8080/graphql");
//! let raw = transport.post_query(TransportRequest::Json(document)).await?;
//! ```

use async_trait::async_trait;
use gtc_document::Document;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ClientConfig, ConfigError};
use crate::multipart::{FormPart, MultipartForm};

/// Longest response body echoed back in errors.
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur while executing an operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status and no GraphQL body
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Endpoint answered with something other than a JSON object
    #[error("Invalid GraphQL response: {0}")]
    InvalidResponse(String),

    /// Client configuration could not be applied
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The body handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportRequest {
    /// `{"query": ..., "variables": ...}` sent as JSON.
    Json(Document),
    /// A `multipart/form-data` body whose `operations` field holds the document.
    Multipart(MultipartForm),
}

impl TransportRequest {
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Executes one operation and returns the raw response object.
///
/// Implementations must return GraphQL-level errors as part of the response
/// (`{"errors": [...]}`), never as `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_query(&self, request: TransportRequest) -> Result<Value, TransportError>;
}

/// HTTP implementation of [`Transport`].
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Create a transport posting to `endpoint` with a default `reqwest::Client`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a transport with a custom `reqwest::Client` (for testing with custom config).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            bearer_token: None,
            headers: Vec::new(),
        }
    }

    /// Create a transport from validated configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        let mut transport = Self::with_client(client, config.endpoint.endpoint_url());
        transport.bearer_token.clone_from(&config.http.bearer_token);
        transport.headers = config.http.header_pairs()?;
        Ok(transport)
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Send an extra header with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_query(&self, request: TransportRequest) -> Result<Value, TransportError> {
        let multipart = request.is_multipart();
        let mut builder = self.client.post(&self.endpoint);

        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request {
            TransportRequest::Json(document) => builder.json(&document),
            TransportRequest::Multipart(form) => builder.multipart(to_form(form)?),
        };

        tracing::debug!(endpoint = %self.endpoint, multipart, "posting GraphQL operation");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "GraphQL response received");
        tracing::trace!(%body, "GraphQL response body");

        let parsed = serde_json::from_str::<Value>(&body)
            .ok()
            .filter(Value::is_object);

        if status.is_success() {
            return parsed.ok_or_else(|| TransportError::InvalidResponse(truncate(body)));
        }

        // GraphQL servers report request errors (e.g. validation) with a 4xx
        // status and a regular response body.
        match parsed {
            Some(value) if is_graphql_response(&value) => Ok(value),
            _ => Err(TransportError::Http {
                status: status.as_u16(),
                message: truncate(body),
            }),
        }
    }
}

fn is_graphql_response(value: &Value) -> bool {
    value.get("data").is_some() || value.get("errors").is_some()
}

fn to_form(form: MultipartForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for (name, part) in form {
        out = match part {
            FormPart::Text(text) => out.text(name, text),
            FormPart::File(upload) => {
                let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
                if let Some(content_type) = &upload.content_type {
                    part = part.mime_str(content_type)?;
                }
                out.part(name, part)
            }
        };
    }
    Ok(out)
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{Transport, TransportError, TransportRequest};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock implementation of `Transport` for unit tests.
    ///
    /// Queue responses with `push_response`/`push_error` and verify
    /// calls with `requests()`. An empty queue answers `{"data": null}`.
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<Value, TransportError>>>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Answer the next unanswered call with `response`.
        pub fn push_response(&self, response: Value) {
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        /// Fail the next unanswered call with `error`.
        pub fn push_error(&self, error: TransportError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        /// Get every request received so far.
        pub fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Get the most recent request.
        pub fn last_request(&self) -> Option<TransportRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_query(&self, request: TransportRequest) -> Result<Value, TransportError> {
            self.requests.lock().unwrap().push(request);

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"data": null})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::FileUpload;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("short".into()), "short");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY);
        let out = truncate(body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= MAX_ERROR_BODY + 3);
    }

    #[test]
    fn graphql_response_detection() {
        assert!(is_graphql_response(&serde_json::json!({"errors": []})));
        assert!(is_graphql_response(&serde_json::json!({"data": null})));
        assert!(!is_graphql_response(&serde_json::json!({"error": "nope"})));
    }

    #[test]
    fn from_config_uses_endpoint_url_and_credentials() {
        let mut config = ClientConfig::for_base_url("http://localhost:4000/");
        config.http.bearer_token = Some("t0k3n".into());
        config.http.headers = vec!["X-Tenant: acme".into()];

        let transport = HttpTransport::from_config(&config).expect("valid config");
        assert_eq!(transport.endpoint(), "http://localhost:4000/graphql");
        assert_eq!(transport.bearer_token.as_deref(), Some("t0k3n"));
        assert_eq!(transport.headers, vec![("X-Tenant".into(), "acme".into())]);
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let result = HttpTransport::from_config(&ClientConfig::default());
        assert!(matches!(result, Err(TransportError::Config(_))));
    }

    #[test]
    fn invalid_mime_type_is_a_request_error() {
        let form = MultipartForm::new().file(
            "0",
            FileUpload::new("a.bin", vec![0u8]).with_content_type("not a mime"),
        );
        assert!(matches!(to_form(form), Err(TransportError::Request(_))));
    }
}
