use serde_json::json;
use trestle_script::builder;
use trestle_script::template::{extract_placeholders, render, validate, Params};
use trestle_script::{HelperBundle, Script};

use trestle_core::errors::ScriptError;
use trestle_core::filter::{TagFilter, TagOperator, TaskFilter};

fn params(pairs: &[(&str, serde_json::Value)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

#[test]
fn validate_reports_extra_bindings_without_failing() {
    let report = validate(
        "const x = {{a}};",
        &params(&[("a", json!(1)), ("b", json!(2))]),
    );
    assert!(report.valid);
    assert!(report.missing.is_empty());
    assert_eq!(report.extra, vec!["b".to_owned()]);
}

#[test]
fn validate_reports_missing_bindings_as_invalid() {
    let report = validate("{{a}} {{b}} {{c}}", &params(&[("b", json!(0))]));
    assert!(!report.valid);
    assert_eq!(report.missing, vec!["a".to_owned(), "c".to_owned()]);
    assert!(report.extra.is_empty());
}

#[test]
fn validate_never_panics_on_no_placeholders() {
    let report = validate("plain text, no bindings", &Params::new());
    assert!(report.valid);
    assert!(report.missing.is_empty());
    assert!(report.extra.is_empty());
}

#[test]
fn render_is_whole_expression_substitution() {
    // A string value lands quoted; the template never supplies the quotes.
    let out = render("call({{who}})", &params(&[("who", json!("a \"b\""))])).unwrap();
    assert_eq!(out, "call(\"a \\\"b\\\"\")");
}

#[test]
fn full_script_for_a_tag_filtered_query_assembles_under_default_limit() {
    let filter = TaskFilter {
        completed: Some(false),
        tags: Some(TagFilter {
            op: TagOperator::And,
            tags: vec!["tag-deep".into(), "tag-work".into()],
        }),
        ..Default::default()
    };
    let request = builder::list_tasks(&filter, 100);
    let script = Script::new(request.bundle, request.render_body().unwrap());
    let text = script.assemble(300_000).unwrap();

    assert!(text.starts_with("function emitSuccess"));
    assert!(text.contains("matchesTaskFilter"));
    // Operator crosses the wire in its runtime spelling
    assert!(text.contains("\"op\":\"AND\""));
    assert!(extract_placeholders(&text).is_empty());
}

#[test]
fn oversized_body_fails_with_breakdown_not_truncation() {
    let request = builder::get_task("t-1");
    let body = request.render_body().unwrap();
    let script = Script::new(request.bundle, body.clone());

    let err = script.assemble(100).unwrap_err();
    match err {
        ScriptError::TooLarge {
            current_bytes,
            max_bytes,
            helper_bytes,
            body_bytes,
        } => {
            assert_eq!(max_bytes, 100);
            assert_eq!(helper_bytes, HelperBundle::Partial.byte_len());
            assert_eq!(body_bytes, body.len());
            assert_eq!(current_bytes, helper_bytes + body_bytes);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[test]
fn smaller_bundle_buys_body_headroom() {
    // Same body size budget, smaller prelude: minimal must leave more room.
    let full = HelperBundle::Full.byte_len();
    let partial = HelperBundle::Partial.byte_len();
    let minimal = HelperBundle::Minimal.byte_len();
    assert!(minimal < partial);
    assert!(partial < full);
}

#[test]
fn mutation_scripts_carry_their_payload_encoded() {
    let spec = trestle_core::records::NewTask {
        name: "Review \"draft\"".into(),
        flagged: true,
        ..Default::default()
    };
    let body = builder::create_task(&spec).render_body().unwrap();
    // The quote survives encoding escaped, never raw inside the literal.
    assert!(body.contains("Review \\\"draft\\\""));
    assert!(body.contains("const spec = {"));
}
