//! Error types for the cfdns client
//!
//! Call-level failures (encoding, transport, cancellation, decoding) carry the
//! request path. Envelope-level failures carry the offending envelope so the
//! rendered message is enough to diagnose what the API sent back. Each
//! workflow step wraps whatever it receives in [`Error::Step`], so the
//! outermost message reads as the full failure path.
//!
//! Causes are part of the message text and are not exposed again through
//! `std::error::Error::source`.

use crate::envelope::Envelope;
use crate::traits::TransportError;
use std::fmt;
use thiserror::Error;

/// Result type alias for cfdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the cfdns client
#[derive(Error, Debug)]
pub enum Error {
    /// The request body could not be serialized to JSON
    #[error("api call {path}: encode request body: {error}")]
    Encode {
        /// Request path
        path: String,
        /// Underlying serializer error
        error: serde_json::Error,
    },

    /// The request could not be built, sent, or its response read
    #[error("api call {path}: {error}")]
    Transport {
        /// Request path
        path: String,
        /// Underlying transport error
        error: TransportError,
    },

    /// The caller's cancellation token fired before the call completed
    #[error("api call {path}: cancelled")]
    Cancelled {
        /// Request path
        path: String,
    },

    /// The response body was not a JSON envelope
    #[error("api call {path}: decode response: {error}")]
    Decode {
        /// Request path
        path: String,
        /// Underlying deserializer error
        error: serde_json::Error,
    },

    /// A well-formed envelope reported `success = false`
    #[error("{context}: no success: {envelope}")]
    Unsuccessful {
        /// Which check rejected the envelope
        context: &'static str,
        /// The envelope as received
        envelope: Box<Envelope>,
    },

    /// The envelope's result did not have the expected shape
    #[error("{context}: {problem}: {envelope}")]
    Shape {
        /// Which check rejected the envelope
        context: &'static str,
        /// What was wrong with it
        problem: ShapeProblem,
        /// The envelope as received
        envelope: Box<Envelope>,
    },

    /// A workflow step failed
    #[error("{step}: {inner}")]
    Step {
        /// The step that failed
        step: Step,
        /// What went wrong inside it
        inner: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The ways an envelope's `result` can fail to match what a step expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeProblem {
    /// `result` is absent or not a list
    NotAList,
    /// `result` is an empty list
    Empty,
    /// The first list item is not an object
    NotAnObject,
    /// The object has no `id` field
    MissingId,
    /// The `id` field is not a string
    IdNotString,
    /// The `id` field is the empty string
    EmptyId,
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShapeProblem::NotAList => "unexpected result",
            ShapeProblem::Empty => "no results",
            ShapeProblem::NotAnObject => "unexpected result item",
            ShapeProblem::MissingId => "missing id",
            ShapeProblem::IdNotString => "unexpected id type",
            ShapeProblem::EmptyId => "empty id",
        };
        f.write_str(text)
    }
}

/// Logical steps of the record update workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The whole `update_record` operation
    UpdateRecord,
    /// Zone name to zone ID
    ResolveZone,
    /// Record type and name to record ID
    ResolveRecord,
    /// The mutating PATCH call
    PatchRecord,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Step::UpdateRecord => "update record",
            Step::ResolveZone => "get zone id",
            Step::ResolveRecord => "get record id",
            Step::PatchRecord => "patch record",
        };
        f.write_str(text)
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap this error with the step it occurred in
    pub fn in_step(self, step: Step) -> Self {
        Self::Step {
            step,
            inner: Box::new(self),
        }
    }

    /// The innermost workflow step this error passed through, if any
    pub fn failed_step(&self) -> Option<Step> {
        match self {
            Error::Step { step, inner } => inner.failed_step().or(Some(*step)),
            _ => None,
        }
    }

    /// The error at the bottom of the step chain
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// Whether the root cause was the caller's cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Error::Cancelled { .. })
    }
}
