//! Transport module.
//!
//! Executes rendered operations against an endpoint. The client core only
//! assembles the request body; everything about HTTP lives behind the
//! [`Transport`] trait.
//!
//! # Architecture
//!
//! - [`Transport`] - Trait defining the single `post_query` operation
//! - [`HttpTransport`] - Real HTTP implementation using reqwest
//! - [`mock::MockTransport`] - Mock for unit tests (behind `test-utils` feature)
//!
//! # Testing Patterns
//!
//! ## Unit Tests (Mock Implementation)
//!
//! Use `MockTransport` for fast, isolated unit tests:
//!
//! ```ignore
//! use graphql_test_client::transport::mock::MockTransport;
//!
//! let mock = MockTransport::new();
//! mock.push_response(json!({"data": {"viewer": {"id": "1"}}}));
//!
//! let client = GraphQlClient::with_transport("http://test", mock);
//! let response = client.query(&Field::with_leaves("viewer", ["id"])).await?;
//! ```
//!
//! ## Integration Tests (HTTP Stubbing)
//!
//! Use `wiremock` to test `HttpTransport` against a stubbed endpoint:
//!
//! ```ignore
//! let server = MockServer::start().await;
//!
//! Mock::given(method("POST"))
//!     .and(path("/graphql"))
//!     .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
//!     .mount(&server)
//!     .await;
//!
//! let transport = HttpTransport::new(format!("{}/graphql", server.uri()));
//! ```

mod client;

pub use client::{HttpTransport, Transport, TransportError, TransportRequest};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
