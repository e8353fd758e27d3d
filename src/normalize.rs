//! Empty-value stripping.
//!
//! Facts never carry placeholders: `null`, `""`, `[]` and `{}` are removed at
//! every depth, and a container left empty by that is removed in turn.
//! `false` and `0` are values and stay.

use serde_json::{Map, Value};

/// Strip empty values from `value`. Returns `Value::Null` when nothing is
/// left.
pub fn remove_empties(value: Value) -> Value {
    prune(value).unwrap_or(Value::Null)
}

fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(prune).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let map: Map<String, Value> = map.into_iter().filter_map(|(k, v)| prune(v).map(|v| (k, v))).collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other),
    }
}
