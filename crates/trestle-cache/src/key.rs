use serde::Serialize;
use trestle_core::errors::TrestleResult;

/// Fingerprint any serializable key material into a cache key.
///
/// Callers pass a tuple or struct of (operation, mode, filter, sort,
/// projection, limit); two requests fingerprint equal exactly when their
/// serialized forms are equal.
pub fn fingerprint<T: Serialize>(parts: &T) -> TrestleResult<String> {
    let serialized = serde_json::to_string(parts)?;
    Ok(blake3::hash(serialized.as_bytes()).to_hex().to_string())
}
