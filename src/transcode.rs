//! Schema transcoding
//!
//! Schemas are authored as YAML and stored as compact JSON. The canonical
//! form is produced from a `serde_json::Value`, whose maps are ordered, so
//! the same document always yields the same stored bytes.

use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Convert a human-authored YAML schema into canonical JSON.
pub fn to_canonical(human: &str) -> Result<String> {
    if human.trim().is_empty() {
        return Err(SchemaError::InvalidSchema("schema document is empty".into()));
    }
    let document: serde_yaml::Value = serde_yaml::from_str(human)
        .map_err(|e| SchemaError::InvalidSchema(format!("not valid YAML: {}", e)))?;
    reject_non_finite(&document)?;
    let value: Value = serde_yaml::from_str(human)
        .map_err(|e| SchemaError::InvalidSchema(format!("not representable as JSON: {}", e)))?;
    if value.is_null() {
        return Err(SchemaError::InvalidSchema("schema document is null".into()));
    }
    Ok(serde_json::to_string(&value)?)
}

/// JSON has no NaN or infinity; `serde_json::Value` would quietly turn them
/// into `null`.
fn reject_non_finite(value: &serde_yaml::Value) -> Result<()> {
    match value {
        serde_yaml::Value::Number(n) if n.is_nan() || n.is_infinite() => Err(
            SchemaError::InvalidSchema(format!("non-finite number {} has no JSON form", n)),
        ),
        serde_yaml::Value::Sequence(items) => items.iter().try_for_each(reject_non_finite),
        serde_yaml::Value::Mapping(map) => map.iter().try_for_each(|(k, v)| {
            reject_non_finite(k)?;
            reject_non_finite(v)
        }),
        serde_yaml::Value::Tagged(tagged) => reject_non_finite(&tagged.value),
        _ => Ok(()),
    }
}

/// Convert canonical JSON back into YAML for callers.
pub fn to_human(canonical: &str) -> Result<String> {
    let value: Value = serde_json::from_str(canonical)
        .map_err(|e| SchemaError::InvalidSchema(format!("stored schema is not JSON: {}", e)))?;
    serde_yaml::to_string(&value)
        .map_err(|e| SchemaError::InvalidSchema(format!("cannot render YAML: {}", e)))
}

/// Parse a YAML document into its structural value, for comparing schemas
/// regardless of formatting.
pub fn structure_of(human: &str) -> Result<Value> {
    serde_yaml::from_str(human).map_err(SchemaError::from)
}
