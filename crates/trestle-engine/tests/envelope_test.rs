//! Envelope parsing against the exact wire text the fixtures emit.

use serde_json::{json, Value};
use test_fixtures::{legacy_failure, legacy_success, records_payload, task, v3_failure, v3_success};
use trestle_core::envelope::{Envelope, EnvelopeVersion};
use trestle_core::errors::ErrorCode;
use trestle_engine::parse_envelope;

const TIMEOUT_MS: u64 = 30_000;

#[test]
fn fixture_success_shapes_parse() {
    let records = records_payload(&[task("t-1", "Water the garden")]);

    match parse_envelope(&v3_success(records.clone()), TIMEOUT_MS).unwrap() {
        Envelope::Success { data, meta } => {
            assert_eq!(meta.version, EnvelopeVersion::V3);
            assert_eq!(meta.query_time_ms, Some(4));
            assert_eq!(data[0]["id"], "t-1");
        }
        Envelope::Failure { message, .. } => panic!("parsed as a failure: {message}"),
    }

    match parse_envelope(&legacy_success(records), TIMEOUT_MS).unwrap() {
        Envelope::Success { data, meta } => {
            assert_eq!(meta.version, EnvelopeVersion::Legacy);
            assert_eq!(meta.query_time_ms, None);
            assert_eq!(meta.metadata, Some(json!({"source": "legacy"})));
            assert_eq!(data[0]["name"], "Water the garden");
        }
        Envelope::Failure { message, .. } => panic!("parsed as a failure: {message}"),
    }
}

#[test]
fn fixture_failures_classify() {
    match parse_envelope(&v3_failure("task not found: t-1"), TIMEOUT_MS).unwrap() {
        Envelope::Failure {
            code,
            message,
            details,
            suggestion,
            ..
        } => {
            assert_eq!(code, ErrorCode::NotFound);
            assert_eq!(message, "task not found: t-1");
            assert_eq!(details.unwrap()["operation"], "test_op");
            assert!(!suggestion.unwrap().is_empty());
        }
        Envelope::Success { .. } => panic!("failure fixture parsed as a success"),
    }

    match parse_envelope(&legacy_failure("Application isn't running. (-600)"), TIMEOUT_MS).unwrap()
    {
        Envelope::Failure { code, meta, .. } => {
            assert_eq!(code, ErrorCode::HostNotRunning);
            assert_eq!(meta.version, EnvelopeVersion::Legacy);
        }
        Envelope::Success { .. } => panic!("failure fixture parsed as a success"),
    }
}

#[test]
fn legacy_wrapping_a_v3_failure_surfaces_the_inner_failure() {
    let inner: Value = serde_json::from_str(&v3_failure("task not found: t-9")).unwrap();
    let wire = legacy_success(inner);

    match parse_envelope(&wire, TIMEOUT_MS).unwrap() {
        Envelope::Failure { code, message, meta, .. } => {
            assert_eq!(code, ErrorCode::NotFound);
            assert_eq!(message, "task not found: t-9");
            // The inner frame describes the real outcome.
            assert_eq!(meta.version, EnvelopeVersion::V3);
            assert_eq!(meta.query_time_ms, Some(4));
        }
        Envelope::Success { .. } => panic!("nested failure parsed as a success"),
    }
}

#[test]
fn record_payloads_are_never_mistaken_for_envelopes() {
    // A record object carries neither a `v` tag nor a `success` boolean, so
    // it stays the terminal payload even though it is an object.
    let record = serde_json::to_value(task("t-1", "Sharpen the mower blade")).unwrap();
    let parsed = parse_envelope(&v3_success(record.clone()), TIMEOUT_MS).unwrap();
    assert!(parsed.is_success());
    assert_eq!(parsed.data(), Some(&record));
}

#[test]
fn non_json_output_is_a_parse_error() {
    let err = parse_envelope("execution error: stack overflow", TIMEOUT_MS).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ParseError);
}
