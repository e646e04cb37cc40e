//! Failure classification: raw runtime text onto the closed taxonomy.
//!
//! The automation runtime reports failures as free text — Apple event error
//! strings from the scripting bridge, exception messages thrown inside
//! generated scripts. Known signatures map to specific codes; anything
//! unrecognized is the catch-all execution error. The remediation
//! suggestion rides on the code, so classification is the whole mapping.

use trestle_core::errors::TrestleError;

/// Map raw failure text to a taxonomy error.
///
/// `timeout_ms` is the dispatch budget in effect, carried into
/// `ScriptTimeout` so the failure reports which budget was exceeded.
/// Matching is case-insensitive on phrases; Apple event error numbers are
/// matched with their parentheses to avoid colliding with ids.
pub fn classify(text: &str, timeout_ms: u64) -> TrestleError {
    let lowered = text.to_lowercase();

    // Apple event -600: application isn't running.
    if lowered.contains("isn't running") || lowered.contains("is not running") || text.contains("(-600)")
    {
        return TrestleError::HostNotRunning {
            reason: text.trim().to_owned(),
        };
    }
    // Apple event -1743: not authorized to send events to the target.
    if lowered.contains("not authorized")
        || lowered.contains("not allowed assistive access")
        || text.contains("(-1743)")
    {
        return TrestleError::PermissionDenied {
            reason: text.trim().to_owned(),
        };
    }
    // Apple event -1712: the event timed out.
    if lowered.contains("timed out") || lowered.contains("timeout") || text.contains("(-1712)") {
        return TrestleError::ScriptTimeout { timeout_ms };
    }
    // Apple event -1728: can't get object. Generated scripts also emit
    // "<entity> not found: <id>".
    if lowered.contains("not found") || lowered.contains("can't get") || text.contains("(-1728)") {
        return TrestleError::NotFound {
            what: text.trim().to_owned(),
        };
    }
    if lowered.contains("duplicate") || lowered.contains("already exists") {
        return TrestleError::DuplicateName {
            name: name_tail(text),
        };
    }

    TrestleError::ExecutionError {
        reason: text.trim().to_owned(),
    }
}

/// The offending name from "duplicate <entity> name: <name>" messages,
/// falling back to the whole text.
fn name_tail(text: &str) -> String {
    match text.rsplit_once(": ") {
        Some((_, tail)) if !tail.trim().is_empty() => tail.trim().to_owned(),
        _ => text.trim().to_owned(),
    }
}
