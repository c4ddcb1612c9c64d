//! Canonical JSON bytes: the one serialization used for hashing.
//!
//! # Rules
//!
//! 1. Object keys sorted by byte order, at every depth.
//! 2. Compact form, no whitespace.
//! 3. Numbers must be integers. Floats are rejected so digests never depend
//!    on float formatting.
//! 4. Arrays keep their order.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    #[error("non-integer number in canonical JSON: {raw}")]
    NonIntegerNumber { raw: String },
    #[error("value is not representable as JSON: {detail}")]
    Serialize { detail: String },
}

/// Canonical bytes of an already-built JSON value.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number is not an `i64`
/// or `u64`.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonError> {
    let normalized = normalize(value)?;
    serde_json::to_vec(&normalized).map_err(|e| CanonError::Serialize { detail: e.to_string() })
}

/// Canonical bytes of any serializable value.
///
/// # Errors
///
/// Returns [`CanonError`] if serialization fails or a float is present.
pub fn canonical_bytes_of<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonError> {
    let tree = serde_json::to_value(value).map_err(|e| CanonError::Serialize {
        detail: e.to_string(),
    })?;
    canonical_json_bytes(&tree)
}

fn normalize(value: &Value) -> Result<Value, CanonError> {
    Ok(match value {
        Value::Number(n) => {
            if n.is_f64() {
                return Err(CanonError::NonIntegerNumber { raw: n.to_string() });
            }
            Value::Number(n.clone())
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect::<Result<_, _>>()?),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), normalize(&map[key])?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}
