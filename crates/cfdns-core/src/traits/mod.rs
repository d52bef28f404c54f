//! Core traits for the cfdns client
//!
//! - [`Transport`]: Put a fully built API request on the wire

pub mod transport;

pub use transport::{ApiRequest, Method, Transport, TransportError};
