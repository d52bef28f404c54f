//! Test doubles and common utilities for client contract tests
//!
//! This module provides a scripted transport that records every request it
//! is handed and replays canned replies in order.

#![allow(dead_code)]

use async_trait::async_trait;
use cfdns_core::traits::{ApiRequest, Transport, TransportError};
use cfdns_core::{CancellationToken, Client};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Token used by every test client
pub const TEST_TOKEN: &str = "test-token";

/// Base URL used by every test client
pub const TEST_BASE: &str = "https://api.test/client/v4/";

/// One canned transport outcome
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return these bytes as the response body
    Body(Vec<u8>),
    /// Fail at the transport level
    Fail(TransportError),
    /// Never complete
    Hang,
}

impl Reply {
    /// Reply with a JSON document
    pub fn json(value: Value) -> Self {
        Reply::Body(serde_json::to_vec(&value).expect("serializable"))
    }

    /// Reply with raw text
    pub fn text(text: &str) -> Self {
        Reply::Body(text.as_bytes().to_vec())
    }
}

/// A Transport that replays scripted replies and records requests
pub struct ScriptedTransport {
    /// Replies, consumed front to back
    replies: Mutex<VecDeque<Reply>>,
    /// Every request received, in order
    requests: Mutex<Vec<ApiRequest>>,
    /// Call counter for send()
    send_call_count: AtomicUsize,
}

impl ScriptedTransport {
    /// Create a transport that will serve `replies` in order
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            send_call_count: AtomicUsize::new(0),
        })
    }

    /// Get the number of times send() was called
    pub fn send_call_count(&self) -> usize {
        self.send_call_count.load(Ordering::SeqCst)
    }

    /// Get the requests received so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the URLs of the requests received so far, relative to the test base
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| {
                request
                    .url
                    .strip_prefix(TEST_BASE)
                    .map(str::to_string)
                    .unwrap_or(request.url)
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        self.send_call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted");

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Fail(error) => Err(error),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Create a client wired to `transport`
pub fn client_for(transport: &Arc<ScriptedTransport>) -> Client {
    let shared: Arc<dyn Transport> = transport.clone();
    Client::new(TEST_TOKEN, shared).with_base_url(TEST_BASE)
}

/// A token that never fires
pub fn live_token() -> CancellationToken {
    CancellationToken::new()
}
