//! JSON document overlay
//!
//! Merge rules, applied key by key from the overlay:
//! - object onto object merges recursively
//! - anything else replaces the base value outright (arrays are not
//!   concatenated, scalars are not combined, type mismatches replace)
//!
//! The base root must be an object. An overlay root that is not an object
//! carries no keys and leaves the base untouched.

use serde_json::{Map, Value};
use thiserror::Error;

/// Structural merge failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// The base document root is not an object
    #[error("base document must be a JSON object, found {0}")]
    BaseNotObject(&'static str),
}

/// Overlay `overlay` onto `base` in place.
pub fn merge_documents(base: &mut Value, overlay: Value) -> Result<(), MergeError> {
    let base_map = match base {
        Value::Object(map) => map,
        other => return Err(MergeError::BaseNotObject(kind(other))),
    };
    if let Value::Object(overlay_map) = overlay {
        merge_maps(base_map, overlay_map);
    }
    Ok(())
}

fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_value) in overlay {
        match overlay_value {
            Value::Object(overlay_child) => {
                if let Some(Value::Object(base_child)) = base.get_mut(&key) {
                    merge_maps(base_child, overlay_child);
                } else {
                    base.insert(key, Value::Object(overlay_child));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Rebuild `value` with object keys in sorted order at every level.
///
/// The serialized form is then stable no matter how the map type orders its
/// entries.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, sort_keys(child)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merged(mut base: Value, overlay: Value) -> Value {
        merge_documents(&mut base, overlay).unwrap();
        base
    }

    #[test]
    fn test_merge_adds_new_sections() {
        let result = merged(
            json!({ "cluster-info": { "name": "c1" } }),
            json!({ "cassandra-yaml": { "authenticator": "AllowAllAuthenticator" } }),
        );
        assert_eq!(
            result,
            json!({
                "cluster-info": { "name": "c1" },
                "cassandra-yaml": { "authenticator": "AllowAllAuthenticator" }
            })
        );
    }

    #[test]
    fn test_merge_recurses_into_objects() {
        let result = merged(
            json!({ "cassandra-yaml": { "num_tokens": 16, "authenticator": "PasswordAuthenticator" } }),
            json!({ "cassandra-yaml": { "authenticator": "AllowAllAuthenticator" } }),
        );
        assert_eq!(
            result,
            json!({ "cassandra-yaml": { "num_tokens": 16, "authenticator": "AllowAllAuthenticator" } })
        );
    }

    #[test]
    fn test_merge_replaces_arrays() {
        let result = merged(
            json!({ "jvm-options": { "additional-jvm-opts": ["-Da=1", "-Db=2"] } }),
            json!({ "jvm-options": { "additional-jvm-opts": ["-Dc=3"] } }),
        );
        assert_eq!(result, json!({ "jvm-options": { "additional-jvm-opts": ["-Dc=3"] } }));
    }

    #[test]
    fn test_merge_type_mismatch_replaces() {
        let result = merged(
            json!({ "a": { "nested": true }, "b": 5, "c": [1] }),
            json!({ "a": "flat", "b": { "nested": 1 }, "c": { "x": 1 } }),
        );
        assert_eq!(result, json!({ "a": "flat", "b": { "nested": 1 }, "c": { "x": 1 } }));
    }

    #[test]
    fn test_merge_null_replaces() {
        let result = merged(json!({ "a": { "b": 1 } }), json!({ "a": null }));
        assert_eq!(result, json!({ "a": null }));
    }

    #[test]
    fn test_merge_empty_overlay_is_identity() {
        let base = json!({ "cluster-info": { "name": "c1", "seeds": "s" } });
        assert_eq!(merged(base.clone(), json!({})), base);
    }

    #[test]
    fn test_merge_non_object_overlay_is_identity() {
        let base = json!({ "a": 1, "b": { "c": [2] } });
        for overlay in [json!([1, 2]), json!("hello"), json!(42), json!(true), json!(null)] {
            assert_eq!(merged(base.clone(), overlay.clone()), base, "overlay {overlay} changed the base");
        }
    }

    #[test]
    fn test_merge_rejects_non_object_base() {
        let mut base = json!("scalar");
        assert_eq!(
            merge_documents(&mut base, json!({})),
            Err(MergeError::BaseNotObject("string"))
        );
    }

    #[test]
    fn test_sort_keys_output_is_sorted() {
        let value = sort_keys(json!({ "b": { "z": 1, "a": [ { "y": 1, "x": 2 } ] }, "a": 0 }));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"a":0,"b":{"a":[{"x":2,"y":1}],"z":1}}"#
        );
    }
}
