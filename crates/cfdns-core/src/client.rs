//! Authenticated API v4 RPC client
//!
//! [`Client::call`] is the single entry point for talking to the API: it
//! appends the caller's path to the base endpoint, attaches the bearer token
//! and JSON content type, hands the request to the [`Transport`], and decodes
//! the reply into an [`Envelope`].
//!
//! A decoded envelope with `success = false` is a normal return value here.
//! Interpreting the flag is the caller's job.

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::traits::{ApiRequest, Method, Transport};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cloudflare API v4 HTTP RPC client
///
/// Holds the bearer token and a shared transport; cloning is cheap and all
/// clones share the same transport. The client keeps no per-call state, so
/// one instance can serve any number of concurrent calls.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
#[derive(Clone)]
pub struct Client {
    /// API bearer token
    /// ⚠️ NEVER log this value
    token: String,

    /// Base endpoint; request paths are appended verbatim
    base_url: String,

    /// HTTP transport for API requests
    transport: Arc<dyn Transport>,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    /// Create a client against the public API endpoint
    pub fn new(token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Create a client from validated configuration
    ///
    /// `timeout_secs` is not used here: the transport owns the per-request
    /// timeout, so build it from the same configuration (e.g.
    /// `HttpTransport::new(Duration::from_secs(config.timeout_secs))`).
    pub fn from_config(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.api_token.clone(), transport).with_base_url(config.base_url.clone()))
    }

    /// Point the client at a different base endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The base endpoint request paths are appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call an API RPC
    ///
    /// # Parameters
    ///
    /// - `cancel`: aborts the call if it fires before the reply arrives
    /// - `method`: the HTTP method
    /// - `path`: endpoint path and query, relative to the base endpoint. It is
    ///   appended as-is; escaping is the caller's responsibility.
    /// - `body`: anything serializable to JSON. `None` sends no body.
    ///
    /// # Returns
    ///
    /// - `Ok(Envelope)`: the decoded reply, whatever its `success` flag says
    /// - `Err(Error)`: encoding, transport, cancellation, or decoding failure,
    ///   labelled with `path`
    pub async fn call<B>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                path: path.to_string(),
            });
        }

        let request = self.build_request(method, path, body)?;
        debug!(%method, path, "api call");

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%method, path, "api call cancelled");
                return Err(Error::Cancelled { path: path.to_string() });
            }
            sent = self.transport.send(request) => sent.map_err(|error| Error::Transport {
                path: path.to_string(),
                error,
            })?,
        };

        let envelope: Envelope = serde_json::from_slice(&raw).map_err(|error| Error::Decode {
            path: path.to_string(),
            error,
        })?;

        debug!(%method, path, success = envelope.success, "api call done");
        Ok(envelope)
    }

    /// Call a read-only endpoint (no body)
    pub async fn get(&self, cancel: &CancellationToken, path: &str) -> Result<Envelope> {
        self.call::<()>(cancel, Method::Get, path, None).await
    }

    fn build_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<ApiRequest>
    where
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(method, format!("{}{}", self.base_url, path))
            .with_header("Authorization", format!("Bearer {}", self.token))
            .with_header("Content-Type", "application/json");

        match body {
            None => Ok(request),
            Some(body) => {
                let encoded = serde_json::to_vec(body).map_err(|error| Error::Encode {
                    path: path.to_string(),
                    error,
                })?;
                Ok(request.with_body(encoded))
            }
        }
    }
}
