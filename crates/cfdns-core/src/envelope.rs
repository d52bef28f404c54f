//! The response envelope shared by every Cloudflare API v4 endpoint
//!
//! The `result` payload is endpoint-specific, so it stays an untyped
//! [`serde_json::Value`] and is only shape-checked on demand through the
//! fallible accessors below. Every accessor refuses to look at `result`
//! unless `success` is true.

use crate::error::{Error, Result, ShapeProblem};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A decoded API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the API considers the call successful
    pub success: bool,

    /// API-reported errors, in order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ApiError>,

    /// Informational messages, in order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<String>,

    /// Endpoint-specific payload (object, list, or null)
    #[serde(default)]
    pub result: Value,

    /// Pagination metadata, present on list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
}

/// One entry of an envelope's `errors` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultInfo {
    pub page: u64,
    pub per_page: u64,
    pub count: u64,
    pub total_count: u64,
}

/// `null` reads the same as a missing list
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Context label used by [`Envelope::first_result`]
const FIRST_RESULT: &str = "get first result";

impl Envelope {
    /// Fail with [`Error::Unsuccessful`] unless `success` is true
    pub fn ensure_success(&self, context: &'static str) -> Result<()> {
        if self.success {
            return Ok(());
        }
        tracing::warn!(
            context,
            errors = self.errors.len(),
            "API reported no success"
        );
        Err(Error::Unsuccessful {
            context,
            envelope: Box::new(self.clone()),
        })
    }

    /// The result as a list, for list endpoints
    pub fn result_list(&self, context: &'static str) -> Result<&[Value]> {
        self.ensure_success(context)?;
        self.result
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.shape_error(context, ShapeProblem::NotAList))
    }

    /// The result as a single object, for single-resource endpoints
    pub fn result_object(&self, context: &'static str) -> Result<&Map<String, Value>> {
        self.ensure_success(context)?;
        self.result
            .as_object()
            .ok_or_else(|| self.shape_error(context, ShapeProblem::NotAnObject))
    }

    /// The first item of a list result, which must be an object
    ///
    /// When the API reports several matches the first one wins; there is no
    /// further tie-break.
    pub fn first_result(&self) -> Result<&Map<String, Value>> {
        let items = self.result_list(FIRST_RESULT)?;
        let first = items
            .first()
            .ok_or_else(|| self.shape_error(FIRST_RESULT, ShapeProblem::Empty))?;
        first
            .as_object()
            .ok_or_else(|| self.shape_error(FIRST_RESULT, ShapeProblem::NotAnObject))
    }

    pub(crate) fn shape_error(&self, context: &'static str, problem: ShapeProblem) -> Error {
        Error::Shape {
            context,
            problem,
            envelope: Box::new(self.clone()),
        }
    }
}

/// Pull a non-empty string `id` out of a result object
///
/// `envelope` is the response the object came from and is rendered into the
/// error on failure.
pub fn required_id(
    object: &Map<String, Value>,
    context: &'static str,
    envelope: &Envelope,
) -> Result<String> {
    let id = match object.get("id") {
        None => return Err(envelope.shape_error(context, ShapeProblem::MissingId)),
        Some(Value::String(id)) => id,
        Some(_) => return Err(envelope.shape_error(context, ShapeProblem::IdNotString)),
    };
    if id.is_empty() {
        return Err(envelope.shape_error(context, ShapeProblem::EmptyId));
    }
    Ok(id.clone())
}

fn write_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

impl fmt::Display for ResultInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}
