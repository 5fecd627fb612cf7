//! Point-in-time views of tree values

use mockbase_core::{tree, Address, Value};

/// An immutable copy of the value at an address
///
/// Later writes to the database are not reflected in a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    key: Option<String>,
    value: Value,
}

impl Snapshot {
    /// Create a snapshot of `value` stored under `key`
    pub fn new(key: Option<String>, value: Value) -> Self {
        Self { key, value }
    }

    /// Whether there was data at the address
    pub fn exists(&self) -> bool {
        !self.value.is_null()
    }

    /// The captured value
    pub fn val(&self) -> &Value {
        &self.value
    }

    /// Take the captured value
    pub fn into_val(self) -> Value {
        self.value
    }

    /// Last segment of the address the value was read from, `None` for the root
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Snapshot of a nested value
    pub fn child(&self, path: &str) -> Snapshot {
        let address = Address::parse(path);
        let value = tree::resolve(&self.value, &address).cloned().unwrap_or_default();
        let key = address.last().map(str::to_string).or_else(|| self.key.clone());
        Snapshot::new(key, value)
    }

    pub fn has_child(&self, path: &str) -> bool {
        self.child(path).exists()
    }

    pub fn num_children(&self) -> usize {
        self.value.as_map().map_or(0, |map| map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists() {
        assert!(!Snapshot::default().exists());
        assert!(Snapshot::new(None, Value::Int(0)).exists());
        assert!(Snapshot::new(None, Value::empty_map()).exists());
    }

    #[test]
    fn test_child() {
        let snapshot = Snapshot::new(
            Some("child".into()),
            Value::object([("name", Value::from("baby")), ("age", Value::Int(0))]),
        );
        let name = snapshot.child("name");
        assert_eq!(name.key(), Some("name"));
        assert_eq!(name.val(), &Value::from("baby"));
        assert!(snapshot.has_child("age"));
        assert!(!snapshot.has_child("nickname"));
        assert_eq!(snapshot.num_children(), 2);
        assert_eq!(snapshot.child("").key(), Some("child"));
    }
}
