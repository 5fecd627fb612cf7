//! Deep-clean normalisation for merged updates
//!
//! The emulated database never stores nulls, empty strings or lists. After an
//! update is merged the result is normalised the same way before it is
//! written:
//!
//! - empty lists are dropped
//! - non-empty lists become maps keyed by the stringified index
//! - nested maps are cleaned recursively
//! - empty strings and nulls are dropped
//!
//! Lists converted to maps are taken as-is; their elements are not cleaned.

use crate::{Value, ValueMap};

/// Convert a list to a map keyed by `"0"`, `"1"`, ...
pub fn list_to_map(list: Vec<Value>) -> ValueMap {
    list.into_iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value))
        .collect()
}

/// Replace every list in `value`, at any depth, by an index-keyed map
///
/// This is how lists are stored in the tree. Nothing else is dropped or
/// rewritten.
pub fn index_lists(value: Value) -> Value {
    match value {
        Value::List(list) => Value::Map(
            list.into_iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), index_lists(value)))
                .collect(),
        ),
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(key, value)| (key, index_lists(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Normalise every entry of `map` in place
pub fn deep_clean(map: &mut ValueMap) {
    let keys: Vec<String> = map.keys().cloned().collect();
    for key in keys {
        let Some(value) = map.get_mut(&key) else {
            continue;
        };
        let keep = match value {
            Value::List(list) if list.is_empty() => false,
            Value::List(list) => {
                *value = Value::Map(list_to_map(std::mem::take(list)));
                true
            }
            Value::Map(nested) => {
                deep_clean(nested);
                true
            }
            Value::String(s) => !s.is_empty(),
            Value::Null => false,
            _ => true,
        };
        if !keep {
            map.shift_remove(&key);
        }
    }
}

/// Normalise an owned value
///
/// Only maps have entries to clean; any other value is returned unchanged.
pub fn cleaned(mut value: Value) -> Value {
    if let Value::Map(map) = &mut value {
        deep_clean(map);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_to_map() {
        let map = list_to_map(vec!["a".into(), "b".into()]);
        assert_eq!(map.get("0"), Some(&Value::from("a")));
        assert_eq!(map.get("1"), Some(&Value::from("b")));
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["0", "1"]);
    }

    #[test]
    fn test_index_lists_is_recursive() {
        let value = index_lists(Value::object([
            ("grid", Value::from(vec![vec![1i64, 2], vec![3i64]])),
            ("name", Value::from("")),
        ]));
        assert_eq!(
            value,
            Value::object([
                (
                    "grid",
                    Value::object([
                        ("0", Value::object([("0", 1i64), ("1", 2)])),
                        ("1", Value::object([("0", 3i64)])),
                    ]),
                ),
                // Empty strings survive; only lists are rewritten
                ("name", Value::from("")),
            ])
        );
    }

    #[test]
    fn test_drops_empty_and_null() {
        let value = cleaned(Value::object([
            ("name", Value::from("baby")),
            ("nickname", Value::from("")),
            ("middle", Value::Null),
            ("tags", Value::List(vec![])),
            ("age", Value::Int(0)),
            ("asleep", Value::Bool(false)),
        ]));
        assert_eq!(
            value,
            Value::object([
                ("name", Value::from("baby")),
                ("age", Value::Int(0)),
                ("asleep", Value::Bool(false)),
            ])
        );
    }

    #[test]
    fn test_lists_become_index_maps() {
        let value = cleaned(Value::object([(
            "toys",
            Value::from(vec!["ball", "", "duck"]),
        )]));
        // Elements of a converted list are left alone
        assert_eq!(
            value.get("toys"),
            Some(&Value::object([("0", "ball"), ("1", ""), ("2", "duck")]))
        );
    }

    #[test]
    fn test_nested_maps_are_cleaned() {
        let value = cleaned(Value::object([(
            "child",
            Value::object([
                ("name", Value::from("baby")),
                ("gone", Value::Null),
                ("inner", Value::object([("empty", "")])),
            ]),
        )]));
        assert_eq!(
            value,
            Value::object([(
                "child",
                Value::object([
                    ("name", Value::from("baby")),
                    ("inner", Value::empty_map()),
                ]),
            )])
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(cleaned(Value::from("")), Value::from(""));
        assert_eq!(cleaned(Value::Int(3)), Value::Int(3));
    }
}
