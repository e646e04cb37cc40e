use proptest::prelude::*;
use serde_json::Value;
use trestle_script::template::{
    declare_parameters, extract_placeholders, render, validate, Params,
};

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,11}"
}

fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,20}".prop_map(Value::from),
    ]
}

fn bindings() -> impl Strategy<Value = Params> {
    proptest::collection::btree_map(identifier(), json_scalar(), 0..8)
}

proptest! {
    /// Declaring parameters and re-extracting placeholders recovers exactly
    /// the sorted key set.
    #[test]
    fn declarations_roundtrip_to_key_set(params in bindings()) {
        let declared = declare_parameters(&params);
        let extracted = extract_placeholders(&declared);
        let keys: Vec<&String> = params.keys().collect();
        let found: Vec<&String> = extracted.iter().collect();
        prop_assert_eq!(found, keys);
    }

    /// A template validated as fully bound always renders, and the rendered
    /// text carries no placeholder residue. (A bound string *value* that
    /// itself looks like a placeholder is allowed to survive: substitution
    /// is single-pass and never re-scans substituted values.)
    #[test]
    fn valid_bindings_always_render(params in bindings()) {
        prop_assume!(params.values().all(|v| !matches!(v, Value::String(s) if s.contains("{{"))));

        let template = declare_parameters(&params);
        let report = validate(&template, &params);
        prop_assert!(report.valid);
        prop_assert!(report.missing.is_empty());

        let rendered = render(&template, &params).unwrap();
        prop_assert!(extract_placeholders(&rendered).is_empty());
    }

    /// Encoded values parse back as the exact value that went in: encoding
    /// is JSON plus extra escapes, never a lossy transformation.
    #[test]
    fn encoding_roundtrips_through_json(value in json_scalar()) {
        let encoded = trestle_script::encode_value(&value);
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(parsed, value);
    }

    /// Dropping any single binding makes validation fail and name the
    /// dropped key.
    #[test]
    fn missing_binding_is_always_reported(params in bindings()) {
        prop_assume!(!params.is_empty());
        let template = declare_parameters(&params);
        let mut incomplete = params.clone();
        let dropped = incomplete.keys().next().cloned().unwrap();
        incomplete.remove(&dropped);

        let report = validate(&template, &incomplete);
        prop_assert!(!report.valid);
        prop_assert!(report.missing.contains(&dropped));
        prop_assert!(render(&template, &incomplete).is_err());
    }
}
