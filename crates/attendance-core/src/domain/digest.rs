//! Canonical JSON digests for cached engine state.
//!
//! A digest identifies the exact configuration a cached cumulative value was
//! computed under. Two values that serialize to the same canonical JSON share
//! a digest, so `120` and `120.0` minutes are treated as the same config.

use serde::Serialize;
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use crate::domain::error::Result;

/// Normalize integer-valued floats, recursively.
///
/// Object keys need no reordering: `serde_json::Map` is ordered by key.
/// Non-finite floats never reach this point because `serde_json` serializes
/// them as `null`; callers that must distinguish them check before digesting.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, canonicalize(item)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Number(n) if !(n.is_i64() || n.is_u64()) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Value::Number(Number::from(f as i64))
            }
            _ => Value::Number(n),
        },
        other => other,
    }
}

/// Render any serializable value as canonical compact JSON.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let canonical = canonicalize(serde_json::to_value(value)?);
    Ok(serde_json::to_string(&canonical)?)
}

/// SHA-256 hex digest of the canonical JSON form of `value`.
pub fn compute_digest<T: Serialize>(value: &T) -> Result<String> {
    let canonical = canonical_json(value)?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}
