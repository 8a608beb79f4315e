#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

//! Build GraphQL operations from field trees, send them, and assert that
//! responses have the expected shape.
//!
//! ```ignore
//! use graphql_test_client::{Field, GraphQlClient, Variable};
//!
//! let client = GraphQlClient::new("http://localhost:8080/graphql");
//! let mutation = Field::new("createUser")
//!     .arg("name", Variable::new("name", "String!", "Ada"))
//!     .child(Field::new("id"));
//!
//! let response = client.mutate(&mutation, None).await?;
//! response.assert_no_errors();
//! response.assert_fields(&mutation);
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod multipart;
pub mod response;
pub mod shape;
pub mod transport;

pub use client::{ClientError, GraphQlClient};
pub use config::ClientConfig;
pub use gtc_document::{
    render_mutation, render_query, ArgumentValue, Document, Field, OperationKind, RenderError,
    Variable, VariableSet,
};
pub use multipart::{FileUpload, MultipartForm};
pub use response::{compose_response, ResponseData};
pub use shape::{assert_graphql_fields, check_fields, ShapeMismatch};
