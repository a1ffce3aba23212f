//! Ordered string-to-string attribute storage.
//!
//! Document attributes, document options and block macro attributes are all
//! plain key/value strings in Diorama. [`AttributeMap`] keeps them in
//! insertion order so that serialized output is stable.

use std::fmt;

use indexmap::IndexMap;

/// An insertion-ordered mapping of attribute names to values.
///
/// # Examples
///
/// ```
/// use diorama_core::attributes::AttributeMap;
///
/// let mut attrs = AttributeMap::new();
/// attrs.insert("imagesdir", "diagrams");
///
/// assert_eq!(attrs.get("imagesdir"), Some("diagrams"));
/// assert!(attrs.get("imagesoutdir").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: IndexMap<String, String>,
}

impl AttributeMap {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns the value stored under `name` unless it is missing or blank.
    ///
    /// A value made only of whitespace counts as absent.
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    /// Returns `true` if an entry named `name` exists, even with an empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Inserts or replaces an entry, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    /// Removes an entry while keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Copies every entry of `other` into this map, overriding existing values.
    pub fn extend_from(&mut self, other: &AttributeMap) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl fmt::Display for AttributeMap {
    /// Formats the map as an AsciiDoc attribute list body: `a=1,b="two words"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (name, value)) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            if value.contains([',', ' ', '"']) {
                write!(f, "{name}=\"{}\"", value.replace('"', "\\\""))?;
            } else {
                write!(f, "{name}={value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let attrs: AttributeMap = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let names: Vec<_> = attrs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_get_non_blank() {
        let attrs: AttributeMap = [("empty", ""), ("spaces", "  \t"), ("set", " x ")]
            .into_iter()
            .collect();

        assert_eq!(attrs.get_non_blank("empty"), None);
        assert_eq!(attrs.get_non_blank("spaces"), None);
        assert_eq!(attrs.get_non_blank("missing"), None);
        assert_eq!(attrs.get_non_blank("set"), Some(" x "));
        assert!(attrs.contains("empty"));
    }

    #[test]
    fn test_extend_overrides_and_remove_keeps_order() {
        let mut attrs: AttributeMap = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        let overrides: AttributeMap = [("b", "20"), ("d", "4")].into_iter().collect();

        attrs.extend_from(&overrides);
        assert_eq!(attrs.get("b"), Some("20"));
        assert_eq!(attrs.len(), 4);

        assert_eq!(attrs.remove("a"), Some("1".to_string()));
        let names: Vec<_> = attrs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "c", "d"]);
    }

    #[test]
    fn test_display_quotes_when_needed() {
        let attrs: AttributeMap = [("viewKey", "SystemContext"), ("title", "System, overview")]
            .into_iter()
            .collect();
        assert_eq!(
            attrs.to_string(),
            "viewKey=SystemContext,title=\"System, overview\""
        );
    }
}
