//! Contract Test: Name-Addressed Record Update
//!
//! This test verifies the zone lookup → record lookup → patch sequence.
//!
//! Constraints verified:
//! - Lookups run in order, the record lookup scoped to the resolved zone ID
//! - The patch targets both resolved IDs and carries only the new content
//! - Any lookup failure stops the workflow before the patch is sent
//! - `success = false` on the patch reply is an update failure
//! - Errors name the step that failed

mod common;

use cfdns_core::updater::{patch_record, resolve_record_id, resolve_zone_id};
use cfdns_core::{Error, Method, RecordUpdate, ShapeProblem, Step, TransportError, update_record};
use common::*;
use serde_json::{Value, json};

fn found(id: &str) -> Reply {
    Reply::json(json!({ "success": true, "result": [{ "id": id }] }))
}

fn shape_problem(err: &Error) -> Option<ShapeProblem> {
    match err.root() {
        Error::Shape { problem, .. } => Some(*problem),
        _ => None,
    }
}

#[tokio::test]
async fn resolves_both_ids_then_patches() {
    let transport = ScriptedTransport::new([
        found("zoneID"),
        found("recordID"),
        Reply::json(json!({ "success": true })),
    ]);
    let client = client_for(&transport);

    update_record(&client, &live_token(), "example.com", "A", "www", "1.2.3.4")
        .await
        .expect("update succeeds");

    assert_eq!(
        transport.paths(),
        vec![
            "zones?match=any&name=example.com".to_string(),
            "zones/zoneID/dns_records?match=any&type=A&name=www".to_string(),
            "zones/zoneID/dns_records/recordID".to_string(),
        ]
    );

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[1].method, Method::Get);
    assert!(requests[0].body.is_none());
    assert!(requests[1].body.is_none());

    let patch = &requests[2];
    assert_eq!(patch.method, Method::Patch);
    let body: Value = serde_json::from_slice(patch.body.as_deref().expect("patch body")).unwrap();
    assert_eq!(body, json!({ "content": "1.2.3.4" }));
}

#[tokio::test]
async fn empty_zone_lookup_stops_before_record_lookup() {
    let transport = ScriptedTransport::new([Reply::json(json!({ "success": true, "result": [] }))]);
    let client = client_for(&transport);

    let err = update_record(&client, &live_token(), "example.com", "A", "www", "1.2.3.4")
        .await
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(Step::ResolveZone));
    assert_eq!(shape_problem(&err), Some(ShapeProblem::Empty));
    assert!(
        err.to_string()
            .starts_with("update record: get zone id: get first result: no results: "),
        "{err}"
    );
    assert_eq!(transport.send_call_count(), 1);
}

#[tokio::test]
async fn unsuccessful_patch_is_an_update_failure() {
    let transport = ScriptedTransport::new([
        found("zoneID"),
        found("recordID"),
        Reply::json(json!({
            "success": false,
            "errors": [{ "code": 1, "message": "nope" }]
        })),
    ]);
    let client = client_for(&transport);

    let err = update_record(&client, &live_token(), "example.com", "A", "www", "1.2.3.4")
        .await
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(Step::PatchRecord));
    match err.root() {
        Error::Unsuccessful { envelope, .. } => {
            assert_eq!(envelope.errors[0].code, 1);
            assert_eq!(envelope.errors[0].message, "nope");
        }
        other => panic!("expected unsuccessful envelope, got {other:?}"),
    }
    assert!(err.to_string().contains(r#""message":"nope""#));
    assert_eq!(transport.send_call_count(), 3);
}

#[tokio::test]
async fn record_lookup_failure_skips_patch() {
    let cases = [
        Reply::json(json!({ "success": true, "result": [] })),
        Reply::json(json!({ "success": false, "errors": [{ "code": 7003, "message": "bad zone" }] })),
        Reply::json(json!({ "success": true, "result": [{ "name": "www" }] })),
        Reply::Fail(TransportError::Network("reset".to_string())),
        Reply::text("not json"),
    ];

    for case in cases {
        let transport = ScriptedTransport::new([found("zoneID"), case]);
        let client = client_for(&transport);

        let err = update_record(&client, &live_token(), "example.com", "A", "www", "1.2.3.4")
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(Step::ResolveRecord), "{err}");
        assert_eq!(transport.send_call_count(), 2, "patch must not be sent: {err}");
        assert!(transport.requests().iter().all(|r| r.method == Method::Get));
    }
}

#[tokio::test]
async fn zone_id_must_be_non_empty_string() {
    let cases = [
        (json!([{ "name": "example.com" }]), ShapeProblem::MissingId),
        (json!([{ "id": 1234 }]), ShapeProblem::IdNotString),
        (json!([{ "id": null }]), ShapeProblem::IdNotString),
        (json!([{ "id": "" }]), ShapeProblem::EmptyId),
        (json!(["zoneID"]), ShapeProblem::NotAnObject),
        (json!({ "id": "zoneID" }), ShapeProblem::NotAList),
        (Value::Null, ShapeProblem::NotAList),
    ];

    for (result, expected) in cases {
        let transport =
            ScriptedTransport::new([Reply::json(json!({ "success": true, "result": result }))]);
        let client = client_for(&transport);

        let err = resolve_zone_id(&client, &live_token(), "example.com")
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(Step::ResolveZone));
        assert_eq!(shape_problem(&err), Some(expected), "{err}");
        assert!(err.to_string().starts_with("get zone id: "), "{err}");
    }
}

#[tokio::test]
async fn record_id_must_be_non_empty_string() {
    let transport = ScriptedTransport::new([Reply::json(json!({
        "success": true,
        "result": [{ "id": "" }]
    }))]);
    let client = client_for(&transport);

    let err = resolve_record_id(&client, &live_token(), "zoneID", "AAAA", "v6.example.com")
        .await
        .unwrap_err();

    assert_eq!(shape_problem(&err), Some(ShapeProblem::EmptyId));
    assert_eq!(
        transport.paths(),
        vec!["zones/zoneID/dns_records?match=any&type=AAAA&name=v6.example.com".to_string()]
    );
}

#[tokio::test]
async fn unsuccessful_lookup_is_not_traversed() {
    // The result looks usable, but success = false must win
    let transport = ScriptedTransport::new([Reply::json(json!({
        "success": false,
        "result": [{ "id": "zoneID" }]
    }))]);
    let client = client_for(&transport);

    let err = resolve_zone_id(&client, &live_token(), "example.com")
        .await
        .unwrap_err();

    assert!(matches!(err.root(), Error::Unsuccessful { .. }));
    assert!(
        err.to_string()
            .starts_with("get zone id: get first result: no success: ")
    );
}

#[tokio::test]
async fn first_match_wins() {
    let transport = ScriptedTransport::new([Reply::json(json!({
        "success": true,
        "result": [{ "id": "first" }, { "id": "second" }]
    }))]);
    let client = client_for(&transport);

    let zone_id = resolve_zone_id(&client, &live_token(), "example.com")
        .await
        .unwrap();
    assert_eq!(zone_id, "first");
}

#[tokio::test]
async fn patch_record_standalone() {
    let transport = ScriptedTransport::new([Reply::json(json!({
        "success": true,
        "result": { "id": "recordID", "content": "10.0.0.1" }
    }))]);
    let client = client_for(&transport);

    patch_record(&client, &live_token(), "zoneID", "recordID", "10.0.0.1")
        .await
        .expect("patch succeeds");
    assert_eq!(transport.paths(), vec!["zones/zoneID/dns_records/recordID".to_string()]);
}

#[tokio::test]
async fn apply_validates_before_any_call() {
    let transport = ScriptedTransport::new([]);
    let client = client_for(&transport);

    let update = RecordUpdate::new("example.com", "A", "www", "");
    let err = cfdns_core::updater::apply(&client, &live_token(), &update)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(transport.send_call_count(), 0);
}

#[tokio::test]
async fn apply_runs_the_workflow() {
    let transport = ScriptedTransport::new([
        found("z1"),
        found("r1"),
        Reply::json(json!({ "success": true })),
    ]);
    let client = client_for(&transport);

    let update = RecordUpdate::new("example.org", "TXT", "_acme.example.org", "token-value");
    cfdns_core::updater::apply(&client, &live_token(), &update)
        .await
        .expect("apply succeeds");

    assert_eq!(
        transport.paths()[1],
        "zones/z1/dns_records?match=any&type=TXT&name=_acme.example.org"
    );
}

#[tokio::test]
async fn null_error_lists_do_not_break_the_workflow() {
    let transport = ScriptedTransport::new([
        Reply::text(r#"{"success":true,"errors":null,"messages":null,"result":[{"id":"zoneID"}]}"#),
        Reply::text(r#"{"success":true,"errors":null,"messages":null,"result":[{"id":"recordID"}]}"#),
        Reply::text(r#"{"success":false,"errors":null,"messages":null,"result":null}"#),
    ]);
    let client = client_for(&transport);

    let err = update_record(&client, &live_token(), "example.com", "A", "www", "1.2.3.4")
        .await
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(Step::PatchRecord));
    assert!(matches!(err.root(), Error::Unsuccessful { .. }), "{err}");
    assert_eq!(transport.send_call_count(), 3);
}
