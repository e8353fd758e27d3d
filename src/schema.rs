//! Declared field types and validation.
//!
//! A `Schema` mirrors the shape of the facts document. Validation walks a
//! document against it in place:
//!
//! - unknown keys are rejected with their full path;
//! - `Int` accepts JSON integers and decimal strings, and rewrites the latter
//!   to numbers (the matcher only ever produces text);
//! - `Choice` accepts exactly one of its literals;
//! - `null` is accepted anywhere and left for `remove_empties`.
//!
//! Paths read like `config[0].if.conditions[1].med.match`.

use crate::error::ValidationError;
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Schema {
    Str,
    Int,
    Bool,
    Choice(&'static [&'static str]),
    Dict(Vec<(&'static str, Schema)>),
    List(Box<Schema>),
    /// The recursive `else` scope, resolved through `argspec::SCOPE`.
    Scope,
}

impl Schema {
    pub(crate) fn dict(fields: Vec<(&'static str, Schema)>) -> Self {
        Schema::Dict(fields)
    }

    pub(crate) fn list_of(inner: Schema) -> Self {
        Schema::List(Box::new(inner))
    }

    fn field(&self, key: &str) -> Option<&Schema> {
        match self {
            Schema::Dict(fields) => fields.iter().find(|(k, _)| *k == key).map(|(_, s)| s),
            _ => None,
        }
    }

    /// Check `value` against this schema, coercing integer strings.
    pub(crate) fn validate(&self, value: &mut Value, path: &str) -> Result<(), ValidationError> {
        if value.is_null() {
            return Ok(());
        }

        match self {
            Schema::Str => match value {
                Value::String(_) => Ok(()),
                Value::Number(n) => {
                    let text = n.to_string();
                    *value = Value::String(text);
                    Ok(())
                }
                other => Err(invalid_type(path, "a string", other)),
            },
            Schema::Int => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
                Value::String(s) => match s.trim().parse::<i64>() {
                    Ok(n) => {
                        *value = Value::Number(Number::from(n));
                        Ok(())
                    }
                    Err(_) => Err(invalid_type(path, "an integer", value)),
                },
                other => Err(invalid_type(path, "an integer", other)),
            },
            Schema::Bool => match value {
                Value::Bool(_) => Ok(()),
                Value::String(s) if s == "true" || s == "false" => {
                    let flag = s == "true";
                    *value = Value::Bool(flag);
                    Ok(())
                }
                other => Err(invalid_type(path, "a boolean", other)),
            },
            Schema::Choice(choices) => match value {
                Value::String(s) if choices.contains(&s.as_str()) => Ok(()),
                Value::String(s) => {
                    Err(ValidationError::InvalidChoice { path: path.to_string(), value: s.clone(), choices: *choices })
                }
                other => Err(invalid_type(path, "a string", other)),
            },
            Schema::Dict(_) => {
                let Value::Object(map) = value else {
                    return Err(invalid_type(path, "a mapping", value));
                };
                for (key, child) in map.iter_mut() {
                    let child_path = format!("{path}.{key}");
                    let Some(schema) = self.field(key) else {
                        return Err(ValidationError::UnsupportedField { path: child_path });
                    };
                    schema.validate(child, &child_path)?;
                }
                Ok(())
            }
            Schema::List(inner) => {
                let Value::Array(items) = value else {
                    return Err(invalid_type(path, "a list", value));
                };
                for (idx, item) in items.iter_mut().enumerate() {
                    inner.validate(item, &format!("{path}[{idx}]"))?;
                }
                Ok(())
            }
            Schema::Scope => crate::argspec::SCOPE.validate(value, path),
        }
    }
}

fn invalid_type(path: &str, expected: &'static str, found: &Value) -> ValidationError {
    let found = match found {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string '{s}'"),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    };
    ValidationError::InvalidType { path: path.to_string(), expected, found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::dict(vec![
            ("name", Schema::Str),
            ("weight", Schema::Int),
            ("drop", Schema::Bool),
            ("combine_condition", Schema::Choice(&["and", "or"])),
            ("apply", Schema::list_of(Schema::dict(vec![("route_policy", Schema::Str)]))),
        ])
    }

    #[test]
    fn integer_strings_become_numbers() {
        let mut doc = json!({"name": "P", "weight": "100", "drop": true});
        sample().validate(&mut doc, "config").unwrap();
        assert_eq!(doc, json!({"name": "P", "weight": 100, "drop": true}));
    }

    #[test]
    fn unknown_key_is_reported_with_its_path() {
        let mut doc = json!({"apply": [{"route_policy": "A"}, {"bogus": "x"}]});
        let err = sample().validate(&mut doc, "config").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedField { path: "config.apply[1].bogus".into() });
    }

    #[test]
    fn non_numeric_int_is_rejected() {
        let mut doc = json!({"weight": "heavy"});
        let err = sample().validate(&mut doc, "config").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { ref path, expected: "an integer", .. } if path == "config.weight"));
    }

    #[test]
    fn choices_are_exact() {
        let mut ok = json!({"combine_condition": "or"});
        sample().validate(&mut ok, "c").unwrap();

        let mut bad = json!({"combine_condition": "then"});
        let err = sample().validate(&mut bad, "c").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidChoice { ref value, .. } if value == "then"));
    }

    #[test]
    fn null_is_accepted_anywhere() {
        let mut doc = json!({"name": null, "weight": null, "apply": null});
        sample().validate(&mut doc, "config").unwrap();
    }
}
