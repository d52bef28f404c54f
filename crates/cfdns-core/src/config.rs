//! Configuration types for the cfdns client
//!
//! This module defines the client settings and the description of a single
//! record update.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloudflare API v4 base endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4/";

/// API client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API bearer token
    /// ⚠️ NEVER log this value
    #[serde(skip_serializing)]
    pub api_token: String,

    /// Base endpoint every request path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request transport timeout (in seconds)
    ///
    /// Read by whoever builds the transport; the client itself has no timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the base endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }

        if self.base_url.is_empty() {
            return Err(crate::Error::config("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Timeout must be > 0"));
        }

        Ok(())
    }
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// One name-addressed record update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    /// Zone name (e.g., "example.com")
    pub zone: String,

    /// Record type (e.g., "A", "AAAA", "TXT")
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// Record name as the API reports it (e.g., "www.example.com")
    pub record_name: String,

    /// New record content
    pub content: String,
}

impl RecordUpdate {
    /// Create a new record update
    pub fn new(
        zone: impl Into<String>,
        record_type: impl Into<String>,
        record_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            record_type: record_type.into(),
            record_name: record_name.into(),
            content: content.into(),
        }
    }

    /// Validate the update
    pub fn validate(&self) -> Result<(), crate::Error> {
        let fields = [
            ("zone", &self.zone),
            ("record type", &self.record_type),
            ("record name", &self.record_name),
            ("content", &self.content),
        ];
        for (label, value) in fields {
            if value.is_empty() {
                return Err(crate::Error::config(format!("Record {label} cannot be empty")));
            }
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_record_type() -> String {
    "A".to_string()
}
