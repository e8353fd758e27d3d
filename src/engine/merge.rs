//! Folding match fragments into one result tree.
//!
//! Every recognized line produces a small fragment rooted at the first
//! segment of its rule name. A scan unit (a scope's global statements, one
//! branch) accumulates those fragments into a single map:
//!
//! - object into object: merged key by key, recursively;
//! - list into list: appended (`apply` lines keep their order);
//! - anything else: the later value replaces the earlier one.
//!
//! So `set weight 10` followed by `set tag 5` yields one `set` object with
//! both keys, and a second `set weight 20` only replaces `weight`.

use serde_json::{Map, Value};

pub(crate) fn merge_into(acc: &mut Map<String, Value>, fragment: Map<String, Value>) {
    for (key, value) in fragment {
        match acc.get_mut(&key) {
            Some(Value::Object(dst)) if value.is_object() => {
                if let Value::Object(src) = value {
                    merge_into(dst, src);
                }
            }
            Some(Value::Array(dst)) if value.is_array() => {
                if let Value::Array(src) = value {
                    dst.extend(src);
                }
            }
            _ => {
                acc.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn objects_merge_per_leaf() {
        let mut acc = object(json!({"set": {"weight": "10", "tag": "1"}}));
        merge_into(&mut acc, object(json!({"set": {"weight": "20"}})));
        assert_eq!(Value::Object(acc), json!({"set": {"weight": "20", "tag": "1"}}));
    }

    #[test]
    fn lists_append_in_order() {
        let mut acc = object(json!({"apply": [{"route_policy": "A"}]}));
        merge_into(&mut acc, object(json!({"apply": [{"route_policy": "B"}]})));
        assert_eq!(Value::Object(acc), json!({"apply": [{"route_policy": "A"}, {"route_policy": "B"}]}));
    }

    #[test]
    fn mismatched_kinds_are_replaced() {
        let mut acc = object(json!({"set": {"next_hop": "x"}}));
        merge_into(&mut acc, object(json!({"set": {"next_hop": {"address": "1.1.1.1"}}})));
        assert_eq!(Value::Object(acc), json!({"set": {"next_hop": {"address": "1.1.1.1"}}}));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut acc = Map::new();
        merge_into(&mut acc, object(json!({"pass": true})));
        merge_into(&mut acc, object(json!({"drop": true})));
        let keys: Vec<&str> = acc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["pass", "drop"]);
    }
}
