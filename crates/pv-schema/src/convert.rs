//! YAML to JSON value conversion.
//!
//! The schema validator works on `serde_json::Value`, so both documents go
//! through here after parsing. Tags are dropped. Scalar map keys are
//! stringified the way a YAML loader hands them to a JSON dumper.

use serde_json::Value;

use crate::error::ConvertError;

/// Convert a parsed YAML tree into the equivalent JSON tree.
///
/// Mapping key order is kept.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, ConvertError> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or(ConvertError::NonFiniteFloat { value: f })
            } else {
                Err(ConvertError::UnsupportedNumber {
                    number: n.to_string(),
                })
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                object.insert(map_key(k)?, yaml_to_json(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn map_key(key: &serde_yaml::Value) -> Result<String, ConvertError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => map_key(&tagged.value),
        other => Err(ConvertError::UnsupportedKey {
            key: format!("{other:?}"),
        }),
    }
}
