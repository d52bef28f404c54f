// # Transport Trait
//
// Defines the seam between the API client and the HTTP stack.
//
// The client builds a complete `ApiRequest` (absolute URL, headers, encoded
// body) and a `Transport` only has to put it on the wire and hand back the
// raw response body.
//
// ## Implementations
//
// - reqwest-based: `cfdns-http` crate
// - Scripted mocks in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use cfdns_core::traits::{ApiRequest, Method, Transport};
//
// let transport = /* Transport implementation */;
// let body = transport.send(ApiRequest::new(Method::Get, url)).await?;
// ```

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// HTTP methods used against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// The upper-case method token
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built API request, ready to send
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL, as built by the client (not validated)
    pub url: String,
    /// Request headers, in insertion order
    pub headers: Vec<(String, String)>,
    /// Encoded request body, if any
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request with no headers and no body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Custom Debug implementation that hides the bearer token
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<REDACTED>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// Failures below the API layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// DNS, connection, TLS, or body read failure
    #[error("network error: {0}")]
    Network(String),

    /// The transport's own deadline expired
    #[error("timed out: {0}")]
    Timeout(String),
}

/// Trait for HTTP transport implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe; one transport is shared by every
/// clone of a [`Client`](crate::Client) and by concurrent calls.
///
/// # Contract
///
/// - Send exactly one request per call. No retries, no backoff.
/// - Return the response body whatever the HTTP status; the envelope's
///   `success` flag is the API's verdict, not the status line.
/// - Connection reuse and TLS validation belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response body
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError>;
}
