//! Addresses into the value tree

use std::fmt;

/// An ordered list of path segments below the root
///
/// The empty address is the root itself. Addresses are immutable values;
/// navigation always produces a new address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(Vec<String>);

impl Address {
    /// The root address
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `/`-separated path relative to the root
    ///
    /// Empty segments are skipped, so `"a//b/"` and `"/a/b"` are the same
    /// address.
    pub fn parse(path: &str) -> Self {
        Self::root().child(path)
    }

    /// Append every segment of a `/`-separated relative path
    pub fn child(&self, path: &str) -> Self {
        let mut segments = self.0.clone();
        segments.extend(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
        Self(segments)
    }

    /// Drop the last segment, or `None` at the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Check if this is the root address
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The last segment, `None` at the root
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Iterate over the segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Check if `self` is `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &Address) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Check if one address lies on the path of the other
    ///
    /// A write at one address changes the value seen at the other.
    pub fn overlaps(&self, other: &Address) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl From<&str> for Address {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_slash() {
        let address = Address::parse("parent/child");
        assert_eq!(address.segments().collect::<Vec<_>>(), vec!["parent", "child"]);
        assert_eq!(address.to_string(), "/parent/child");
        assert_eq!(Address::parse("/parent//child/"), address);
    }

    #[test]
    fn test_child_does_not_touch_original() {
        let parent = Address::parse("a");
        let child = parent.child("b/c");
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 3);
        assert_eq!(child.last(), Some("c"));
    }

    #[test]
    fn test_parent() {
        let address = Address::parse("a/b");
        assert_eq!(address.parent(), Some(Address::parse("a")));
        assert_eq!(Address::parse("a").parent(), Some(Address::root()));
        assert_eq!(Address::root().parent(), None);
    }

    #[test]
    fn test_root() {
        let root = Address::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "/");
        assert_eq!(root.last(), None);
        assert_eq!(Address::parse(""), root);
    }

    #[test]
    fn test_overlaps() {
        let a = Address::parse("a");
        let ab = Address::parse("a/b");
        let ac = Address::parse("a/c");
        assert!(a.overlaps(&ab));
        assert!(ab.overlaps(&a));
        assert!(ab.overlaps(&ab));
        assert!(!ab.overlaps(&ac));
        assert!(Address::root().overlaps(&ac));
        // Segment-wise, not string-wise
        assert!(!Address::parse("ab").overlaps(&a));
    }
}
