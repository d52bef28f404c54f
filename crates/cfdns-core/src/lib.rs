// # cfdns-core
//
// Client library for the Cloudflare API v4 DNS endpoints.
//
// ## Architecture Overview
//
// - **Client**: Authenticated RPC client; one generic `call` per request
// - **Envelope**: The uniform `success`/`errors`/`messages`/`result` reply
// - **Transport**: Trait seam between the client and the HTTP stack
// - **updater**: Name-addressed record updates (zone lookup → record lookup → patch)
//
// ## Data Flow
//
// caller → updater → Client::call → Transport → API, with envelopes flowing
// back up and each layer labelling errors with the step that failed.
//
// ## Design Principles
//
// 1. **No hidden state**: the client holds only its token, base URL, and transport
// 2. **Explicit shape checks**: `result` stays untyped and is checked on demand
// 3. **Fail fast**: no retries, no caching, no fallback identifiers
// 4. **Cancellable**: every call observes the caller's `CancellationToken`

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod traits;
pub mod updater;

// Re-export core types for convenience
pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL, RecordUpdate};
pub use envelope::{ApiError, Envelope, ResultInfo};
pub use error::{Error, Result, ShapeProblem, Step};
pub use traits::{ApiRequest, Method, Transport, TransportError};
pub use updater::{UpdateStage, update_record};
pub use tokio_util::sync::CancellationToken;
