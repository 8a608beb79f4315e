//! The test client: render, execute, compose.

use gtc_document::{render_mutation, render_query, Document, Field, RenderError};
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::multipart::MultipartForm;
use crate::response::{compose_response, ResponseData};
use crate::shape;
use crate::transport::{HttpTransport, Transport, TransportError, TransportRequest};

/// Errors from executing an operation.
///
/// GraphQL errors returned by the server are not in this list; they are
/// reported on [`ResponseData::errors`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to render operation: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Executes field trees as GraphQL operations.
///
/// ```ignore
/// let client = GraphQlClient::new("http://localhost:8080/graphql");
/// let query = Field::new("user").arg("id", 1).child(Field::new("name"));
///
/// let response = client.query(&query).await?;
/// response.assert_no_errors();
/// client.assert_graphql_fields(response.data().unwrap(), &query);
/// ```
pub struct GraphQlClient<T = HttpTransport> {
    transport: T,
    base_url: String,
}

impl GraphQlClient<HttpTransport> {
    /// Client posting directly to `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            transport: HttpTransport::new(base_url.clone()),
            base_url,
        }
    }

    /// Client built from validated configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: HttpTransport::from_config(config)?,
            base_url: config.endpoint.base_url.clone(),
        })
    }
}

impl<T: Transport> GraphQlClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `query` as `query { ... }` and compose the result under its name.
    ///
    /// # Errors
    /// Returns an error if the tree cannot be rendered or the transport fails.
    pub async fn query(&self, query: &Field) -> Result<ResponseData, ClientError> {
        let document = render_query(query)?;
        let raw = self.execute(document, None).await?;
        Ok(compose_response(raw, query.name()))
    }

    /// Run `mutation` as `mutation (...) { ... }` and compose the result
    /// under its name. With `multipart`, the operation is sent as a
    /// `multipart/form-data` body whose `operations` field holds the document.
    ///
    /// # Errors
    /// Returns an error if the tree cannot be rendered or the transport fails.
    pub async fn mutate(
        &self,
        mutation: &Field,
        multipart: Option<MultipartForm>,
    ) -> Result<ResponseData, ClientError> {
        let document = render_mutation(mutation)?;
        let raw = self.execute(document, multipart).await?;
        Ok(compose_response(raw, mutation.name()))
    }

    /// Send an already rendered document and return the raw response.
    ///
    /// # Errors
    /// Returns an error if the transport fails.
    pub async fn execute(
        &self,
        document: Document,
        multipart: Option<MultipartForm>,
    ) -> Result<Value, ClientError> {
        let request = match multipart {
            Some(extra) => TransportRequest::Multipart(MultipartForm::for_operation(&document, extra)),
            None => TransportRequest::Json(document),
        };
        Ok(self.transport.post_query(request).await?)
    }

    /// Fail the current test unless `actual` contains every field selected
    /// by `query`. See [`shape::assert_graphql_fields`].
    pub fn assert_graphql_fields(&self, actual: &Value, query: &Field) {
        shape::assert_graphql_fields(actual, query);
    }
}
