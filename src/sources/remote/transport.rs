//! Query transport: sends a [`QueryRequest`] and returns the `data` object.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::sources::remote::QueryRequest;

/// Failure of a single query round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },

    #[error("response has no data")]
    MissingData,
}

/// Executes GraphQL requests.
///
/// Implementations must be usable from several threads at once.
pub trait QueryTransport: Send + Sync {
    /// Run one request and return the response `data` object.
    fn run(&self, request: &QueryRequest) -> Result<Value, TransportError>;
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// GraphQL over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the given endpoint.
    ///
    /// `timeout` bounds every request; it is the only deadline applied to
    /// remote calls.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hubq/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpTransport { client, endpoint })
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl QueryTransport for HttpTransport {
    fn run(&self, request: &QueryRequest) -> Result<Value, TransportError> {
        tracing::debug!(
            "POST {} ({}, {} variables)",
            self.endpoint,
            request.operation_name,
            request.variables.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GraphQlResponse = response.json()?;
        into_data(body)
    }
}

fn into_data(response: GraphQlResponse) -> Result<Value, TransportError> {
    if !response.errors.is_empty() {
        return Err(TransportError::GraphQl {
            messages: response.errors.into_iter().map(|e| e.message).collect(),
        });
    }

    match response.data {
        Some(Value::Null) | None => Err(TransportError::MissingData),
        Some(data) => Ok(data),
    }
}
