//! Resolution of addresses against a value tree
//!
//! Reads never fail: a missing segment, or a segment that runs into a
//! scalar, resolves to `None` ("no data at path"). List elements are
//! addressed by their index. Writes create any missing intermediate maps on
//! the way down and store lists as index-keyed maps.

use crate::clean::{index_lists, list_to_map};
use crate::{Address, Value, ValueMap};

fn list_index(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok()
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Map(map) => map.get(segment),
        Value::List(list) => list.get(list_index(segment)?),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Map(map) => map.get_mut(segment),
        Value::List(list) => list.get_mut(list_index(segment)?),
        _ => None,
    }
}

/// Turn `node` into a map, keeping list elements under their indices
fn make_map(node: &mut Value) -> &mut ValueMap {
    match node {
        Value::Map(_) => {}
        Value::List(list) => *node = Value::Map(list_to_map(std::mem::take(list))),
        _ => *node = Value::Map(ValueMap::new()),
    }
    match node {
        Value::Map(map) => map,
        _ => unreachable!("node was just replaced by a map"),
    }
}

/// Look up the value at `address`
///
/// The root address resolves to the whole tree.
pub fn resolve<'a>(tree: &'a Value, address: &Address) -> Option<&'a Value> {
    address
        .segments()
        .try_fold(tree, |node, segment| child(node, segment))
}

/// Look up the value at `address` for in-place mutation
pub fn resolve_mut<'a>(tree: &'a mut Value, address: &Address) -> Option<&'a mut Value> {
    address
        .segments()
        .try_fold(tree, |node, segment| child_mut(node, segment))
}

/// Replace the subtree at `address` with `value`
///
/// Missing intermediate levels are created as maps; an intermediate scalar
/// is overwritten by a map and an intermediate list becomes an index-keyed
/// map with its elements kept. Writing `Null` below the root deletes the key
/// instead of storing a null.
pub fn assign(tree: &mut Value, address: &Address, value: Value) {
    if value.is_null() {
        remove(tree, address);
        return;
    }

    let mut node = tree;
    for segment in address.segments() {
        node = make_map(node)
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }
    *node = index_lists(value);
}

/// Delete the subtree at `address`, returning what was there
///
/// Removing the root leaves a null tree.
pub fn remove(tree: &mut Value, address: &Address) -> Option<Value> {
    let Some(parent) = address.parent() else {
        return Some(std::mem::take(tree));
    };
    let key = address.last()?;
    let parent = resolve_mut(tree, &parent)?;
    if !matches!(parent, Value::Map(_) | Value::List(_)) {
        return None;
    }
    make_map(parent).shift_remove(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> Value {
        Value::object([(
            "parent",
            Value::object([("child", Value::object([("name", "baby")]))]),
        )])
    }

    #[test]
    fn test_resolve_matches_direct_indexing() {
        let tree = family();
        let child = tree.get("parent").and_then(|p| p.get("child"));
        assert_eq!(resolve(&tree, &Address::parse("parent/child")), child);
        assert_eq!(
            resolve(&tree, &Address::parse("parent/child/name")),
            Some(&Value::from("baby"))
        );
    }

    #[test]
    fn test_resolve_root_is_whole_tree() {
        let tree = family();
        assert_eq!(resolve(&tree, &Address::root()), Some(&tree));
    }

    #[test]
    fn test_resolve_missing_is_none() {
        let tree = family();
        assert_eq!(resolve(&tree, &Address::parse("nobody/here")), None);
        // Descending through a scalar
        assert_eq!(resolve(&tree, &Address::parse("parent/child/name/x")), None);
    }

    #[test]
    fn test_assign_replaces_subtree() {
        let mut tree = family();
        assign(&mut tree, &Address::parse("parent/child/name"), "baby-2".into());
        assert_eq!(
            tree,
            Value::object([(
                "parent",
                Value::object([("child", Value::object([("name", "baby-2")]))]),
            )])
        );
    }

    #[test]
    fn test_assign_creates_intermediates() {
        let mut tree = Value::empty_map();
        assign(&mut tree, &Address::parse("a/b/c"), 1i64.into());
        assert_eq!(resolve(&tree, &Address::parse("a/b/c")), Some(&Value::Int(1)));
        assert!(resolve(&tree, &Address::parse("a/b")).unwrap().is_map());
    }

    #[test]
    fn test_assign_overwrites_scalar_intermediate() {
        let mut tree = family();
        assign(&mut tree, &Address::parse("parent/child/name/first"), "b".into());
        assert_eq!(
            resolve(&tree, &Address::parse("parent/child/name")),
            Some(&Value::object([("first", "b")]))
        );
    }

    #[test]
    fn test_assign_root() {
        let mut tree = family();
        assign(&mut tree, &Address::root(), 7i64.into());
        assert_eq!(tree, Value::Int(7));
    }

    #[test]
    fn test_assign_null_deletes() {
        let mut tree = family();
        assign(&mut tree, &Address::parse("parent/child"), Value::Null);
        assert_eq!(tree, Value::object([("parent", Value::empty_map())]));

        // Deleting something that is not there leaves the tree alone
        assign(&mut tree, &Address::parse("x/y"), Value::Null);
        assert_eq!(tree, Value::object([("parent", Value::empty_map())]));
    }

    fn numbers() -> Value {
        Value::object([("a", Value::from(vec![1i64, 2, 3]))])
    }

    #[test]
    fn test_resolve_indexes_lists() {
        let tree = numbers();
        assert_eq!(resolve(&tree, &Address::parse("a/1")), Some(&Value::Int(2)));
        assert_eq!(resolve(&tree, &Address::parse("a/3")), None);
        assert_eq!(resolve(&tree, &Address::parse("a/x")), None);
    }

    #[test]
    fn test_assign_through_list_keeps_siblings() {
        let mut tree = numbers();
        assign(&mut tree, &Address::parse("a/0"), 9i64.into());
        assert_eq!(
            tree,
            Value::object([("a", Value::object([("0", 9i64), ("1", 2), ("2", 3)]))])
        );
    }

    #[test]
    fn test_assign_stores_lists_as_maps() {
        let mut tree = Value::empty_map();
        assign(
            &mut tree,
            &Address::parse("toys"),
            Value::from(vec![Value::from("ball"), Value::from(vec!["red"])]),
        );
        assert_eq!(
            tree,
            Value::object([(
                "toys",
                Value::object([
                    ("0", Value::from("ball")),
                    ("1", Value::object([("0", "red")])),
                ]),
            )])
        );
        assert_eq!(resolve(&tree, &Address::parse("toys/1/0")), Some(&Value::from("red")));
    }

    #[test]
    fn test_remove_list_element() {
        let mut tree = numbers();
        assert_eq!(remove(&mut tree, &Address::parse("a/1")), Some(Value::Int(2)));
        assert_eq!(
            tree,
            Value::object([("a", Value::object([("0", 1i64), ("2", 3)]))])
        );
    }

    #[test]
    fn test_remove_returns_old_value() {
        let mut tree = family();
        let removed = remove(&mut tree, &Address::parse("parent/child/name"));
        assert_eq!(removed, Some(Value::from("baby")));
        assert_eq!(remove(&mut tree, &Address::parse("parent/child/name")), None);
    }
}
