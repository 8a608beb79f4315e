//! Common test utilities for integration tests.
//!
//! This module provides:
//!
//! - [`http_mock`] - `wiremock` re-exports and a stubbed GraphQL endpoint
//! - [`fixtures`] - Field trees shared by several test files
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::http_mock::graphql_server;
//!
//! #[tokio::test]
//! async fn test_against_stub() {
//!     let server = graphql_server(json!({"data": {"viewer": {"id": "1"}}})).await;
//!     let client = GraphQlClient::new(graphql_url(&server));
//!     // ...
//! }
//! ```

#![allow(dead_code)]

pub mod http_mock;

pub mod fixtures {
    use graphql_test_client::{ArgumentValue, Field, Variable};

    /// `user(id: 42) { id name posts { title } }`
    pub fn user_query() -> Field {
        Field::new("user")
            .arg("id", 42)
            .child(Field::new("id"))
            .child(Field::new("name"))
            .child(Field::with_leaves("posts", ["title"]))
    }

    /// `createUser(input: {name: $name, email: $email}) { id }`
    pub fn create_user_mutation() -> Field {
        Field::new("createUser")
            .arg(
                "input",
                ArgumentValue::object([
                    ("name", Variable::new("name", "String!", "Ada")),
                    ("email", Variable::new("email", "String", "ada@example.com")),
                ]),
            )
            .child(Field::new("id"))
    }

    /// `uploadAvatar(file: $file) { url }` with `$file` sent as null.
    pub fn upload_mutation() -> Field {
        Field::new("uploadAvatar")
            .arg("file", Variable::new("file", "Upload!", serde_json::Value::Null))
            .child(Field::new("url"))
    }
}
