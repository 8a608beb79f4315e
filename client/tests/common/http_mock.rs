//! HTTP mock server helpers for testing outbound GraphQL calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing. Use it to stand in for a GraphQL endpoint in integration tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::{graphql_server, graphql_url};
//!
//! #[tokio::test]
//! async fn test_query() {
//!     let server = graphql_server(json!({"data": {"user": {"id": "1"}}})).await;
//!     let transport = HttpTransport::new(graphql_url(&server));
//!     // Assertions inspect server.received_requests()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `ResponseTemplate::new(200).set_body_json(value)`
//! - **Error response**: `ResponseTemplate::new(500).set_body_string("...")`
//! - **Request verification**: `.expect(1)` to assert call count

pub use wiremock::matchers::{body_json, body_string_contains, header, method, path};
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use serde_json::Value;
use wiremock::Request;

/// Path every stub in these tests is mounted on.
pub const GRAPHQL_PATH: &str = "/graphql";

/// Start a server answering every `POST /graphql` with `body`.
pub async fn graphql_server(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Full endpoint URL of `server`.
pub fn graphql_url(server: &MockServer) -> String {
    format!("{}{GRAPHQL_PATH}", server.uri())
}

/// The single request `server` received.
#[allow(clippy::expect_used)]
pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}
