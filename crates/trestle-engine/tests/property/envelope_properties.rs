//! Property checks over envelope parsing and failure classification.

use proptest::prelude::*;
use serde_json::{json, Value};
use trestle_core::envelope::Envelope;
use trestle_engine::{classify, parse_envelope};

const TIMEOUT_MS: u64 = 5_000;

/// Terminal payloads that can never be mistaken for an envelope frame.
fn terminal_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,12}".prop_map(Value::from),
        proptest::collection::vec(any::<i32>(), 0..4).prop_map(|items| json!(items)),
    ]
}

/// Wrap a value in `depth` success frames, alternating wire shapes.
fn wrap(value: Value, depth: usize) -> Value {
    let mut wrapped = value;
    for level in 0..depth {
        wrapped = if level % 2 == 0 {
            json!({"ok": true, "v": "3", "data": wrapped, "query_time_ms": level})
        } else {
            json!({"success": true, "data": wrapped, "metadata": {"level": level}})
        };
    }
    wrapped
}

proptest! {
    // Classification never rejects an input, and every outcome carries
    // remediation text.
    #[test]
    fn classification_is_total(text in ".{0,120}") {
        let err = classify(&text, TIMEOUT_MS);
        prop_assert!(!err.suggestion().is_empty());
    }

    #[test]
    fn success_chains_unwrap_to_the_terminal_payload(
        payload in terminal_payload(),
        depth in 1usize..6,
    ) {
        let wire = wrap(payload.clone(), depth).to_string();
        let envelope = parse_envelope(&wire, TIMEOUT_MS).unwrap();
        prop_assert_eq!(envelope.data(), Some(&payload));
    }

    // Parsing a nested chain equals parsing its innermost frame directly.
    #[test]
    fn unwrapping_is_idempotent(
        payload in terminal_payload(),
        depth in 1usize..5,
    ) {
        let inner = json!({"ok": true, "v": "3", "data": payload, "query_time_ms": 9});
        let direct = parse_envelope(&inner.to_string(), TIMEOUT_MS).unwrap();
        let nested = parse_envelope(&wrap(inner, depth).to_string(), TIMEOUT_MS).unwrap();
        prop_assert_eq!(direct, nested);
    }

    #[test]
    fn failures_survive_any_nesting_depth(
        message in "[a-z ]{1,40}",
        depth in 0usize..5,
    ) {
        let failure = json!({"ok": false, "v": "3", "error": {"message": message.clone()}});
        let wire = wrap(failure, depth).to_string();
        let envelope = parse_envelope(&wire, TIMEOUT_MS).unwrap();
        match envelope {
            Envelope::Failure { message: got, .. } => prop_assert_eq!(got, message),
            Envelope::Success { .. } => prop_assert!(false, "failure parsed as a success"),
        }
    }

    #[test]
    fn objects_without_discriminators_are_parse_errors(
        entries in proptest::collection::btree_map("[a-u]{1,8}", any::<i32>(), 0..5),
    ) {
        let mut frame = serde_json::Map::new();
        for (key, value) in entries {
            frame.insert(key, json!(value));
        }
        let wire = Value::Object(frame).to_string();
        prop_assert!(parse_envelope(&wire, TIMEOUT_MS).is_err());
    }
}
