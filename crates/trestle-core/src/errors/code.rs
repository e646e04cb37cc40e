use serde::{Deserialize, Serialize};

/// Closed failure taxonomy. Every failure the layer can surface maps to
/// exactly one of these codes; `ExecutionError` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    ScriptTooLarge,
    HostNotRunning,
    PermissionDenied,
    ScriptTimeout,
    NotFound,
    DuplicateName,
    ParseError,
    ExecutionError,
}

impl ErrorCode {
    /// Total number of codes in the taxonomy.
    pub const COUNT: usize = 9;

    /// All codes for iteration.
    pub const ALL: [ErrorCode; 9] = [
        Self::InvalidInput,
        Self::ScriptTooLarge,
        Self::HostNotRunning,
        Self::PermissionDenied,
        Self::ScriptTimeout,
        Self::NotFound,
        Self::DuplicateName,
        Self::ParseError,
        Self::ExecutionError,
    ];

    /// Wire name, SCREAMING_SNAKE_CASE.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::ScriptTooLarge => "SCRIPT_TOO_LARGE",
            Self::HostNotRunning => "HOST_NOT_RUNNING",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ScriptTimeout => "SCRIPT_TIMEOUT",
            Self::NotFound => "NOT_FOUND",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::ParseError => "PARSE_ERROR",
            Self::ExecutionError => "EXECUTION_ERROR",
        }
    }

    /// User-displayable remediation for this code.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput => {
                "Check the request arguments against the operation's documented shape and retry."
            }
            Self::ScriptTooLarge => {
                "Select a smaller helper bundle, narrow the filter, or lower the result limit to shrink the generated program."
            }
            Self::HostNotRunning => "Launch the automation target application and retry.",
            Self::PermissionDenied => {
                "Grant automation access in System Settings > Privacy & Security > Automation, then retry."
            }
            Self::ScriptTimeout => {
                "Narrow the filter or raise dispatch.timeout_ms. The call was abandoned; do not blindly retry mutations."
            }
            Self::NotFound => {
                "Verify the id still exists; the record may have been completed or deleted since the last query."
            }
            Self::DuplicateName => "Choose a different name or update the existing record instead.",
            Self::ParseError => {
                "The automation runtime returned output this layer cannot parse; check the target application version."
            }
            Self::ExecutionError => {
                "Inspect the error message; if the failure persists, restart the target application."
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
