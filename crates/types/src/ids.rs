//! Newtype wrappers for identifiers written into the page.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The identifier assigned to a heading so that a TOC link can target it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AnchorId(Arc<str>);

impl AnchorId {
    /// Creates a new AnchorId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this anchor ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment form used in link `href`s, e.g. `#Intro_0`.
    pub fn fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl From<String> for AnchorId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_id_creation() {
        let id1 = AnchorId::new("Intro_0");
        let id2 = AnchorId::from("Intro_0");
        let id3 = AnchorId::from(String::from("Intro_0"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "Intro_0");
    }

    #[test]
    fn test_fragment() {
        assert_eq!(AnchorId::new("Summary_2").fragment(), "#Summary_2");
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut anchors = HashMap::new();
        anchors.insert(AnchorId::new("Intro_0"), 0usize);
        anchors.insert(AnchorId::new("Details_1"), 1);

        assert_eq!(anchors.get(&AnchorId::new("Details_1")), Some(&1));
    }
}
