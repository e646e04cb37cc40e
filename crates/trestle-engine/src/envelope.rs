//! Envelope parsing: raw script output into the versioned result model.
//!
//! Detection is strict. A frame with a string `v` key is current-generation
//! (v3); a frame with a boolean `success` key and no `v` is legacy; anything
//! else is unparseable. Helpers occasionally wrap one envelope inside
//! another's `data` (a passthrough operation forwarding a nested call), so a
//! success whose payload is itself envelope-shaped is unwrapped until a
//! terminal payload remains. The innermost frame's metadata wins, and a
//! nested failure stays a failure no matter how many success frames
//! surround it.

use serde_json::{Map, Value};
use trestle_core::envelope::{Envelope, EnvelopeMeta, EnvelopeVersion};
use trestle_core::errors::{TrestleError, TrestleResult};

use crate::classify::classify;

/// Parse raw script output into a terminal envelope.
///
/// `timeout_ms` is the dispatch budget in effect, used when a reported
/// failure classifies as a timeout.
pub fn parse_envelope(raw: &str, timeout_ms: u64) -> TrestleResult<Envelope> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|err| TrestleError::ParseError {
        reason: format!("script output is not JSON: {err}"),
    })?;
    parse_envelope_value(value, timeout_ms)
}

/// Parse an already-decoded JSON value into a terminal envelope.
///
/// Bulk scripts return arrays whose elements are themselves envelopes; this
/// entry point lets the per-record path skip re-serialization.
pub fn parse_envelope_value(value: Value, timeout_ms: u64) -> TrestleResult<Envelope> {
    let mut current = parse_frame(value, timeout_ms)?;
    loop {
        current = match current {
            Envelope::Success { data, .. } if envelope_shaped(&data) => {
                parse_frame(data, timeout_ms)?
            }
            terminal => return Ok(terminal),
        };
    }
}

/// Collapse an envelope into the payload or the taxonomy error.
///
/// Classification is a pure function of the failure message, so the error
/// produced here carries the same code the parser assigned.
pub fn into_result(envelope: Envelope, timeout_ms: u64) -> TrestleResult<(Value, EnvelopeMeta)> {
    match envelope {
        Envelope::Success { data, meta } => Ok((data, meta)),
        Envelope::Failure { message, .. } => Err(classify(&message, timeout_ms)),
    }
}

fn envelope_shaped(value: &Value) -> bool {
    value.as_object().and_then(detect_version).is_some()
}

/// Which schema generation a frame belongs to, or `None` when the frame
/// carries neither discriminator.
fn detect_version(frame: &Map<String, Value>) -> Option<EnvelopeVersion> {
    if frame.get("v").is_some_and(Value::is_string) {
        return Some(EnvelopeVersion::V3);
    }
    if frame.get("success").is_some_and(Value::is_boolean) {
        return Some(EnvelopeVersion::Legacy);
    }
    None
}

fn parse_frame(value: Value, timeout_ms: u64) -> TrestleResult<Envelope> {
    let Value::Object(frame) = value else {
        return Err(undetectable());
    };
    match detect_version(&frame) {
        Some(EnvelopeVersion::V3) => parse_v3(frame, timeout_ms),
        Some(EnvelopeVersion::Legacy) => Ok(parse_legacy(frame, timeout_ms)),
        None => Err(undetectable()),
    }
}

fn undetectable() -> TrestleError {
    TrestleError::ParseError {
        reason: "output carries neither a version tag nor a success discriminator".to_owned(),
    }
}

fn parse_v3(mut frame: Map<String, Value>, timeout_ms: u64) -> TrestleResult<Envelope> {
    let meta = EnvelopeMeta {
        version: EnvelopeVersion::V3,
        query_time_ms: frame.get("query_time_ms").and_then(Value::as_u64),
        metadata: None,
    };
    let Some(ok) = frame.get("ok").and_then(Value::as_bool) else {
        return Err(TrestleError::ParseError {
            reason: "v3 envelope has no boolean `ok` discriminator".to_owned(),
        });
    };
    if ok {
        let data = frame.remove("data").unwrap_or(Value::Null);
        return Ok(Envelope::Success { data, meta });
    }

    let (message, details) = match frame.remove("error") {
        Some(Value::Object(mut err)) => {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown automation failure")
                .to_owned();
            let mut extras = Map::new();
            if let Some(stack) = err.remove("stack") {
                extras.insert("stack".to_owned(), stack);
            }
            if let Some(operation) = err.remove("operation") {
                extras.insert("operation".to_owned(), operation);
            }
            let details = (!extras.is_empty()).then(|| Value::Object(extras));
            (message, details)
        }
        Some(Value::String(message)) => (message, None),
        _ => ("unknown automation failure".to_owned(), None),
    };
    Ok(failure(message, details, meta, timeout_ms))
}

fn parse_legacy(mut frame: Map<String, Value>, timeout_ms: u64) -> Envelope {
    let meta = EnvelopeMeta {
        version: EnvelopeVersion::Legacy,
        query_time_ms: None,
        metadata: frame.remove("metadata"),
    };
    let success = frame
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if success {
        let data = frame.remove("data").unwrap_or(Value::Null);
        return Envelope::Success { data, meta };
    }

    let (message, details) = match frame.remove("error") {
        Some(Value::Object(mut err)) => {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown automation failure")
                .to_owned();
            (message, err.remove("details"))
        }
        Some(Value::String(message)) => (message, None),
        _ => ("unknown automation failure".to_owned(), None),
    };
    failure(message, details, meta, timeout_ms)
}

fn failure(message: String, details: Option<Value>, meta: EnvelopeMeta, timeout_ms: u64) -> Envelope {
    let code = classify(&message, timeout_ms).code();
    Envelope::Failure {
        code,
        suggestion: Some(code.suggestion().to_owned()),
        message,
        details,
        meta,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trestle_core::errors::ErrorCode;

    use super::*;

    const BUDGET: u64 = 30_000;

    #[test]
    fn v3_success_carries_payload_and_query_time() {
        let raw = json!({"ok": true, "v": "3", "data": {"id": "t-1"}, "query_time_ms": 12})
            .to_string();
        let envelope = parse_envelope(&raw, BUDGET).unwrap();
        let Envelope::Success { data, meta } = envelope else {
            panic!("expected success");
        };
        assert_eq!(data["id"], "t-1");
        assert_eq!(meta.version, EnvelopeVersion::V3);
        assert_eq!(meta.query_time_ms, Some(12));
    }

    #[test]
    fn legacy_success_preserves_metadata() {
        let raw = json!({"success": true, "data": [1, 2], "metadata": {"source": "cache"}})
            .to_string();
        let envelope = parse_envelope(&raw, BUDGET).unwrap();
        let meta = envelope.meta().clone();
        assert_eq!(meta.version, EnvelopeVersion::Legacy);
        assert_eq!(meta.metadata, Some(json!({"source": "cache"})));
        assert_eq!(meta.query_time_ms, None);
    }

    #[test]
    fn v3_failure_classifies_and_keeps_stack_details() {
        let raw = json!({
            "ok": false,
            "v": "3",
            "error": {
                "message": "Not authorized to send Apple events. (-1743)",
                "stack": "runQuery@line 4",
                "operation": "query_tasks"
            },
            "query_time_ms": 3
        })
        .to_string();
        let envelope = parse_envelope(&raw, BUDGET).unwrap();
        let Envelope::Failure {
            code,
            details,
            suggestion,
            ..
        } = envelope
        else {
            panic!("expected failure");
        };
        assert_eq!(code, ErrorCode::PermissionDenied);
        let details = details.unwrap();
        assert_eq!(details["operation"], "query_tasks");
        assert_eq!(details["stack"], "runQuery@line 4");
        assert!(suggestion.unwrap().contains("System Settings"));
    }

    #[test]
    fn legacy_failure_accepts_a_bare_string_error() {
        let raw = json!({"success": false, "error": "task not found: t-9", "metadata": {}})
            .to_string();
        let envelope = parse_envelope(&raw, BUDGET).unwrap();
        let Envelope::Failure { code, message, .. } = envelope else {
            panic!("expected failure");
        };
        assert_eq!(code, ErrorCode::NotFound);
        assert_eq!(message, "task not found: t-9");
    }

    #[test]
    fn missing_discriminators_are_a_parse_error() {
        for raw in [
            json!({"data": [1]}).to_string(),
            json!({"v": 3, "ok": true}).to_string(),
            json!({"success": "yes"}).to_string(),
            json!([1, 2]).to_string(),
        ] {
            let err = parse_envelope(&raw, BUDGET).unwrap_err();
            assert_eq!(err.code(), ErrorCode::ParseError, "input: {raw}");
        }
    }

    #[test]
    fn v3_without_boolean_ok_is_a_parse_error() {
        let raw = json!({"v": "3", "ok": "true"}).to_string();
        let err = parse_envelope(&raw, BUDGET).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseError);
    }

    #[test]
    fn non_json_output_is_a_parse_error() {
        let err = parse_envelope("execution error: stack overflow", BUDGET).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseError);
    }

    #[test]
    fn nested_envelopes_unwrap_to_the_inner_payload() {
        let inner = json!({"success": true, "data": {"id": "t-1"}, "metadata": {"hop": 2}});
        let raw = json!({"ok": true, "v": "3", "data": inner, "query_time_ms": 9}).to_string();
        let envelope = parse_envelope(&raw, BUDGET).unwrap();
        let Envelope::Success { data, meta } = envelope else {
            panic!("expected success");
        };
        assert_eq!(data["id"], "t-1");
        // The inner frame's metadata wins over the outer one.
        assert_eq!(meta.version, EnvelopeVersion::Legacy);
        assert_eq!(meta.query_time_ms, None);
        assert_eq!(meta.metadata, Some(json!({"hop": 2})));
    }

    #[test]
    fn nested_failure_never_becomes_a_success() {
        let inner = json!({
            "ok": false,
            "v": "3",
            "error": {"message": "Application isn't running. (-600)", "operation": "probe"},
            "query_time_ms": 1
        });
        let raw = json!({"success": true, "data": inner, "metadata": {}}).to_string();
        let envelope = parse_envelope(&raw, BUDGET).unwrap();
        let Envelope::Failure { code, meta, .. } = envelope else {
            panic!("expected failure");
        };
        assert_eq!(code, ErrorCode::HostNotRunning);
        assert_eq!(meta.version, EnvelopeVersion::V3);
    }

    #[test]
    fn into_result_reproduces_the_assigned_code() {
        let raw = json!({
            "ok": false,
            "v": "3",
            "error": {"message": "AppleEvent timed out. (-1712)", "operation": "query_tasks"},
            "query_time_ms": 2
        })
        .to_string();
        let envelope = parse_envelope(&raw, 7_500).unwrap();
        let parsed_code = match &envelope {
            Envelope::Failure { code, .. } => *code,
            Envelope::Success { .. } => panic!("expected failure"),
        };
        let err = into_result(envelope, 7_500).unwrap_err();
        assert_eq!(err.code(), parsed_code);
        match err {
            TrestleError::ScriptTimeout { timeout_ms } => assert_eq!(timeout_ms, 7_500),
            other => panic!("expected ScriptTimeout, got {other:?}"),
        }
    }

    #[test]
    fn null_data_success_yields_null_payload() {
        let raw = json!({"ok": true, "v": "3", "query_time_ms": 0}).to_string();
        let (data, _) = into_result(parse_envelope(&raw, BUDGET).unwrap(), BUDGET).unwrap();
        assert_eq!(data, Value::Null);
    }
}
