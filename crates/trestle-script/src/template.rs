//! `{{identifier}}` placeholder templates: extraction, validation, rendering.
//!
//! Pure and stateless. Validation reports instead of failing so templates
//! and callers can evolve independently; rendering substitutes whole
//! expressions through the safe encoder only.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use trestle_core::errors::ScriptError;

use crate::encode::encode_value;

/// Parameter bindings for one render. A `BTreeMap` keeps generated text
/// deterministic for a given binding set.
pub type Params = BTreeMap<String, Value>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").unwrap());

/// Outcome of checking a template against a binding set. Never an error:
/// missing placeholders make `valid` false, unused bindings are tolerated
/// and merely reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Placeholders in the template with no binding, sorted.
    pub missing: Vec<String>,
    /// Bindings with no placeholder in the template, sorted.
    pub extra: Vec<String>,
}

/// The sorted, de-duplicated set of `{{name}}` placeholders in `template`.
pub fn extract_placeholders(template: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_owned())
        .collect()
}

/// Check `template` against `params` without rendering.
pub fn validate(template: &str, params: &Params) -> ValidationReport {
    let placeholders = extract_placeholders(template);
    let missing: Vec<String> = placeholders
        .iter()
        .filter(|name| !params.contains_key(*name))
        .cloned()
        .collect();
    let extra: Vec<String> = params
        .keys()
        .filter(|key| !placeholders.contains(*key))
        .cloned()
        .collect();
    ValidationReport {
        valid: missing.is_empty(),
        missing,
        extra,
    }
}

/// Emit one `const` binding line per parameter, in key order.
///
/// The emitted lines are themselves template text (`const k = {{k}};`), so
/// a later render binds the values and a bound symbol exists in the script
/// even when the body never uses the placeholder. This is what lets
/// templates and callers evolve independently.
pub fn declare_parameters(params: &Params) -> String {
    let mut out = String::new();
    for key in params.keys() {
        out.push_str("const ");
        out.push_str(key);
        out.push_str(" = {{");
        out.push_str(key);
        out.push_str("}};\n");
    }
    out
}

/// Substitute every placeholder in `template` with its encoded binding.
///
/// Whole-expression substitution only: the placeholder is replaced by a
/// complete JavaScript expression, never spliced into a partial string.
/// The first placeholder without a binding fails the render.
pub fn render(template: &str, params: &Params) -> Result<String, ScriptError> {
    let mut missing: Option<String> = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        match params.get(name) {
            Some(value) => encode_value(value),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_owned());
                }
                String::new()
            }
        }
    });
    match missing {
        Some(name) => Err(ScriptError::MissingParameter { name }),
        None => Ok(rendered.into_owned()),
    }
}
