// # HTTP Transport
//
// This crate provides the production `Transport` for the cfdns client,
// built on `reqwest`.
//
// ## Behaviour
//
// - ✅ One HTTP request per `send` call
// - ✅ Connection reuse via a single shared `reqwest::Client`
// - ✅ TLS validation delegated to reqwest's default backend
// - ✅ Per-request timeout (30 seconds by default)
// - ✅ Response body returned whatever the status code; the API's envelope
//   carries the verdict
// - ❌ NO retry logic
// - ❌ NO status-code interpretation
//
// ## Security Requirements
//
// - Header values (the bearer token) NEVER appear in logs

use async_trait::async_trait;
use cfdns_core::traits::{ApiRequest, Method, Transport, TransportError};
use std::time::Duration;
use thiserror::Error;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors building the transport itself
#[derive(Error, Debug)]
pub enum BuildError {
    /// reqwest refused the client configuration (e.g., no TLS backend)
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// reqwest-backed API transport
///
/// Cheap to share: hold it in an `Arc` and hand it to as many
/// [`cfdns_core::Client`]s as needed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// Per-request timeout
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, BuildError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Create a transport with the default timeout
    pub fn with_default_timeout() -> Result<Self, BuildError> {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }

    /// The configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        let ApiRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| TransportError::InvalidRequest(format!("{url}: {e}")))?;

        let mut builder = self.client.request(to_reqwest_method(method), parsed);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        tracing::debug!(%method, %url, "sending request");

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "response received");

        let bytes = response.bytes().await.map_err(classify)?;
        Ok(bytes.to_vec())
    }
}
