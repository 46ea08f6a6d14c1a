//! # Promise Schema Extraction
//!
//! A Promise wraps a CRD-style API definition. The structural schema for
//! resources lives at
//! `spec.api.spec.versions[0].schema.openAPIV3Schema`.
//!
//! Only the first version is consulted. A missing segment anywhere on the
//! path is reported as [`ExtractError::MissingKey`] naming the first
//! segment that could not be resolved.

use std::fmt;

use serde_json::Value;

use crate::error::ExtractError;

/// One step of the path into the Promise document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Key(&'static str),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "'{k}'"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Location of the embedded OpenAPI v3 schema.
pub const SCHEMA_PATH: [Segment; 7] = [
    Segment::Key("spec"),
    Segment::Key("api"),
    Segment::Key("spec"),
    Segment::Key("versions"),
    Segment::Index(0),
    Segment::Key("schema"),
    Segment::Key("openAPIV3Schema"),
];

/// Type assumed for a schema that does not declare one.
pub const DEFAULT_SCHEMA_TYPE: &str = "object";

/// Resolve [`SCHEMA_PATH`] in a Promise document and return a copy of the
/// schema found there.
///
/// # Errors
///
/// Returns [`ExtractError::MissingKey`] for the first segment that is
/// absent, including when its parent is a scalar.
pub fn extract_schema(promise: &Value) -> Result<Value, ExtractError> {
    let mut current = promise;
    for segment in SCHEMA_PATH {
        let next = match segment {
            Segment::Key(k) => current.as_object().and_then(|o| o.get(k)),
            Segment::Index(i) => current.as_array().and_then(|a| a.get(i)),
        };
        current = next.ok_or_else(|| {
            tracing::debug!(%segment, "promise schema path not resolved");
            ExtractError::MissingKey {
                key: segment.to_string(),
            }
        })?;
    }
    Ok(current.clone())
}

/// Return `schema` with `type: object` added when it declares no `type`.
///
/// The input is left untouched. Non-mapping schemas are returned as is and
/// left for the validator to reject.
pub fn with_default_type(schema: &Value) -> Value {
    match schema {
        Value::Object(map) if !map.contains_key("type") => {
            let mut map = map.clone();
            map.insert("type".to_string(), Value::from(DEFAULT_SCHEMA_TYPE));
            Value::Object(map)
        }
        other => other.clone(),
    }
}
