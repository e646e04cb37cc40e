//! Production sink: runs generated scripts through the host `osascript`
//! binary.
//!
//! The program is fed on stdin so script size is bounded by the assembly
//! limit, not by argv limits. Stdout is the envelope; stderr carries the
//! scripting bridge's own failure text (Apple event error strings), which
//! is returned verbatim so the classifier can read the signatures.
//!
//! The dispatcher serializes calls and owns the timeout budget. A call that
//! outlives its budget is abandoned by the caller, not killed here; a
//! wedged runtime surfaces as timeouts on subsequent calls.

use std::io::Write;
use std::process::{Command, Stdio};

use trestle_core::traits::{AutomationSink, SinkError};

/// Runs scripts via `osascript -l JavaScript -`.
///
/// Construction succeeds on any platform; executing without the binary
/// reports a launch failure through [`SinkError`].
#[derive(Debug, Clone)]
pub struct OsascriptSink {
    program: String,
    args: Vec<String>,
}

impl OsascriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the target binary and its arguments. Used by tests and by
    /// deployments that wrap `osascript` in a shim.
    pub fn with_command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for OsascriptSink {
    fn default() -> Self {
        Self {
            program: "osascript".to_owned(),
            args: vec!["-l".to_owned(), "JavaScript".to_owned(), "-".to_owned()],
        }
    }
}

impl AutomationSink for OsascriptSink {
    fn execute(&self, source: &str) -> Result<String, SinkError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| SinkError::new(format!("failed to launch {}: {err}", self.program)))?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(SinkError::new(format!(
                "no stdin handle for {}",
                self.program
            )));
        };
        stdin
            .write_all(source.as_bytes())
            .map_err(|err| SinkError::new(format!("failed to feed script: {err}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|err| SinkError::new(format!("failed to collect output: {err}")))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        // The bridge prints Apple event failures on stderr; pass them through
        // untouched so the known signatures remain matchable.
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => String::from_utf8_lossy(&output.stdout).trim().to_owned(),
            text => text.to_owned(),
        };
        if detail.is_empty() {
            return Err(SinkError::new(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        Err(SinkError::new(detail))
    }
}
