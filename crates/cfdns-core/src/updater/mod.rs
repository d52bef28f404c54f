//! Name-addressed DNS record updates
//!
//! The mutating endpoint only accepts opaque zone and record IDs, so updating
//! "zone example.com, type A, name www.example.com" takes three calls:
//!
//! ```text
//! Start ──GET zones?match=any&name={zone}──────────────────────▶ ZoneResolved
//! ZoneResolved ──GET zones/{zone_id}/dns_records?match=any&type&name──▶ RecordResolved
//! RecordResolved ──PATCH zones/{zone_id}/dns_records/{record_id}──▶ Updated
//! ```
//!
//! Each step needs the previous step's output, so the calls run strictly in
//! order. The first failure ends the operation: nothing is retried, nothing
//! is rolled back, and the PATCH is never sent if either lookup failed.
//! Resolved IDs are not cached between invocations.

use crate::client::Client;
use crate::config::RecordUpdate;
use crate::envelope::required_id;
use crate::error::{Result, Step};
use crate::traits::Method;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Progress of a single [`update_record`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Start,
    ZoneResolved,
    RecordResolved,
    Updated,
}

/// Partial update body; fields other than `content` are left alone
#[derive(Debug, Serialize)]
struct ContentPatch<'a> {
    content: &'a str,
}

/// Update a DNS record's content, addressing it by zone, type, and name
///
/// # Parameters
///
/// - `zone`: zone name (e.g., "example.com")
/// - `record_type`: record type (e.g., "A")
/// - `record_name`: record name as the API reports it
/// - `value`: new record content
///
/// # Errors
///
/// Any failure is wrapped in [`Step::UpdateRecord`] around the step that
/// failed; [`Error::failed_step`](crate::Error::failed_step) names it.
pub async fn update_record(
    client: &Client,
    cancel: &CancellationToken,
    zone: &str,
    record_type: &str,
    record_name: &str,
    value: &str,
) -> Result<()> {
    run_update(client, cancel, zone, record_type, record_name, value)
        .await
        .map_err(|e| e.in_step(Step::UpdateRecord))
}

/// [`update_record`] driven by a [`RecordUpdate`] description
pub async fn apply(client: &Client, cancel: &CancellationToken, update: &RecordUpdate) -> Result<()> {
    update.validate()?;
    update_record(
        client,
        cancel,
        &update.zone,
        &update.record_type,
        &update.record_name,
        &update.content,
    )
    .await
}

async fn run_update(
    client: &Client,
    cancel: &CancellationToken,
    zone: &str,
    record_type: &str,
    record_name: &str,
    value: &str,
) -> Result<()> {
    let mut stage = UpdateStage::Start;
    debug!(?stage, zone, record_type, record_name, "updating record");

    let zone_id = resolve_zone_id(client, cancel, zone).await?;
    stage = UpdateStage::ZoneResolved;
    info!(?stage, zone, zone_id = %zone_id, "zone resolved");

    let record_id = resolve_record_id(client, cancel, &zone_id, record_type, record_name).await?;
    stage = UpdateStage::RecordResolved;
    info!(?stage, record_name, record_id = %record_id, "record resolved");

    patch_record(client, cancel, &zone_id, &record_id, value).await?;
    stage = UpdateStage::Updated;
    info!(?stage, record_name, record_type, "record updated");

    Ok(())
}

/// Resolve a zone name to its zone ID
///
/// If several zones match, the first one the API lists wins.
pub async fn resolve_zone_id(
    client: &Client,
    cancel: &CancellationToken,
    zone: &str,
) -> Result<String> {
    let path = format!("zones?match=any&name={zone}");
    lookup_first_id(client, cancel, &path, Step::ResolveZone)
        .await
        .map_err(|e| e.in_step(Step::ResolveZone))
}

/// Resolve a record type and name within a zone to the record ID
///
/// If several records match, the first one the API lists wins.
pub async fn resolve_record_id(
    client: &Client,
    cancel: &CancellationToken,
    zone_id: &str,
    record_type: &str,
    record_name: &str,
) -> Result<String> {
    let path = format!("zones/{zone_id}/dns_records?match=any&type={record_type}&name={record_name}");
    lookup_first_id(client, cancel, &path, Step::ResolveRecord)
        .await
        .map_err(|e| e.in_step(Step::ResolveRecord))
}

/// Set a record's content by IDs
///
/// The API's `success` flag is authoritative: a transported, decoded reply
/// with `success = false` is an error.
pub async fn patch_record(
    client: &Client,
    cancel: &CancellationToken,
    zone_id: &str,
    record_id: &str,
    value: &str,
) -> Result<()> {
    let path = format!("zones/{zone_id}/dns_records/{record_id}");
    let body = ContentPatch { content: value };

    let patched = async {
        let envelope = client.call(cancel, Method::Patch, &path, Some(&body)).await?;
        envelope.ensure_success("update response")
    };
    patched.await.map_err(|e| e.in_step(Step::PatchRecord))
}

async fn lookup_first_id(
    client: &Client,
    cancel: &CancellationToken,
    path: &str,
    step: Step,
) -> Result<String> {
    let envelope = client.get(cancel, path).await?;
    let first = envelope.first_result()?;
    let id = required_id(first, "first result", &envelope)?;
    debug!(%step, id = %id, "resolved id");
    Ok(id)
}
