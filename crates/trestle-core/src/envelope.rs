//! Versioned result envelope: the success/failure wrapper around every
//! automation call's payload.
//!
//! Two wire shapes exist. Legacy (no `v` key):
//! `{success, data?, error?: {message, details?}, metadata}` — and current:
//! `{ok, v: "3", data?, error?: {message, stack?, operation}, query_time_ms}`.
//! Parsing and unwrapping live in `trestle-engine`; this module is the
//! parsed model only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ErrorCode;

/// Envelope schema generation, detected from the wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeVersion {
    /// `{success, …, metadata}` — no `v` tag.
    Legacy,
    /// `{ok, v: "3", …, query_time_ms}`.
    V3,
}

/// Metadata preserved from the envelope frame around the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub version: EnvelopeVersion,
    /// Runtime-reported execution time, when the shape carries one.
    pub query_time_ms: Option<u64>,
    /// Legacy free-form metadata object, passed through untouched.
    pub metadata: Option<Value>,
}

impl EnvelopeMeta {
    pub fn bare(version: EnvelopeVersion) -> Self {
        Self {
            version,
            query_time_ms: None,
            metadata: None,
        }
    }
}

/// Parsed, terminal result of an automation call.
///
/// Exactly one variant is populated. A nested envelope inside a `data` field
/// is unwrapped before a value of this type is produced, so `Success::data`
/// is always a terminal payload, never another envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Envelope {
    Success {
        data: Value,
        meta: EnvelopeMeta,
    },
    Failure {
        /// Taxonomy code assigned by the failure classifier at parse time.
        code: ErrorCode,
        message: String,
        details: Option<Value>,
        /// Remediation text for the assigned code.
        suggestion: Option<String>,
        meta: EnvelopeMeta,
    },
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The envelope frame metadata, whichever variant is populated.
    pub fn meta(&self) -> &EnvelopeMeta {
        match self {
            Self::Success { meta, .. } => meta,
            Self::Failure { meta, .. } => meta,
        }
    }

    /// Success payload, if this is a success.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}
