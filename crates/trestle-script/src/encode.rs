//! Safe value encoding for generated program text.
//!
//! Every bound value crosses into JavaScript source through this module;
//! no caller splices raw strings into a script. Encoding is JSON, which is
//! valid JavaScript expression syntax, with two extra escapes: U+2028 and
//! U+2029 are legal in JSON strings but terminate string literals in
//! pre-ES2019 JavaScript engines, so they must never appear raw.

use serde_json::Value;

/// Encode one bound value as a JavaScript expression.
///
/// Strings come out quoted and escaped, numbers and booleans literal,
/// `null` as `null`, objects and arrays as JSON. The result is always a
/// complete expression, never a fragment to be spliced into a larger
/// string literal.
pub fn encode_value(value: &Value) -> String {
    escape_line_separators(&value.to_string())
}

/// Encode a plain string the same way `encode_value` would.
pub fn encode_str(s: &str) -> String {
    encode_value(&Value::String(s.to_owned()))
}

fn escape_line_separators(json: &str) -> String {
    if !json.contains(['\u{2028}', '\u{2029}']) {
        return json.to_owned();
    }
    let mut out = String::with_capacity(json.len() + 8);
    for c in json.chars() {
        match c {
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strings_are_quoted_and_escaped() {
        assert_eq!(encode_str("plain"), "\"plain\"");
        assert_eq!(encode_str("with \"quotes\""), "\"with \\\"quotes\\\"\"");
        assert_eq!(encode_str("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn scalars_are_literal() {
        assert_eq!(encode_value(&json!(42)), "42");
        assert_eq!(encode_value(&json!(2.5)), "2.5");
        assert_eq!(encode_value(&json!(true)), "true");
        assert_eq!(encode_value(&json!(null)), "null");
    }

    #[test]
    fn compound_values_are_json() {
        assert_eq!(
            encode_value(&json!({"ids": ["a", "b"]})),
            "{\"ids\":[\"a\",\"b\"]}"
        );
    }

    #[test]
    fn line_and_paragraph_separators_are_escaped() {
        let encoded = encode_str("a\u{2028}b\u{2029}c");
        assert_eq!(encoded, "\"a\\u2028b\\u2029c\"");
        assert!(!encoded.contains('\u{2028}'));
        assert!(!encoded.contains('\u{2029}'));
    }
}
