//! Error taxonomy: a closed set of codes, a structured umbrella error, and
//! per-code remediation text.
//!
//! The execution bridge surfaces every predictable failure as one of these;
//! only truly unexpected process-level faults propagate unhandled.

mod code;
mod script_error;

pub use code::ErrorCode;
pub use script_error::ScriptError;

pub type TrestleResult<T> = Result<T, TrestleError>;

/// Umbrella error for the whole layer. One variant per taxonomy code, each
/// carrying the structured fields callers need to act on the failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrestleError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(
        "script too large: {current_bytes} bytes, max {max_bytes} (helpers {helper_bytes} + body {body_bytes})"
    )]
    ScriptTooLarge {
        current_bytes: usize,
        max_bytes: usize,
        helper_bytes: usize,
        body_bytes: usize,
    },

    #[error("automation host not running: {reason}")]
    HostNotRunning { reason: String },

    #[error("automation permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("script timed out after {timeout_ms} ms")]
    ScriptTimeout { timeout_ms: u64 },

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("unparseable automation response: {reason}")]
    ParseError { reason: String },

    #[error("execution failed: {reason}")]
    ExecutionError { reason: String },
}

impl TrestleError {
    /// Taxonomy code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::ScriptTooLarge { .. } => ErrorCode::ScriptTooLarge,
            Self::HostNotRunning { .. } => ErrorCode::HostNotRunning,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::ScriptTimeout { .. } => ErrorCode::ScriptTimeout,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::DuplicateName { .. } => ErrorCode::DuplicateName,
            Self::ParseError { .. } => ErrorCode::ParseError,
            Self::ExecutionError { .. } => ErrorCode::ExecutionError,
        }
    }

    /// User-displayable remediation for this error.
    pub fn suggestion(&self) -> &'static str {
        self.code().suggestion()
    }
}

impl From<ScriptError> for TrestleError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::MissingParameter { name } => Self::InvalidInput {
                reason: format!("no binding for placeholder {{{{{name}}}}}"),
            },
            ScriptError::TooLarge {
                current_bytes,
                max_bytes,
                helper_bytes,
                body_bytes,
            } => Self::ScriptTooLarge {
                current_bytes,
                max_bytes,
                helper_bytes,
                body_bytes,
            },
        }
    }
}

impl From<serde_json::Error> for TrestleError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            reason: err.to_string(),
        }
    }
}
