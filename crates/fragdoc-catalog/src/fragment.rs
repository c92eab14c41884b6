//! Fragment record and identifier

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Composite fragment identifier, `"<group>-<localId>"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(String);

impl FragmentId {
    /// Build the composite id for a group-local id
    #[inline]
    #[must_use]
    pub fn compose(group: &str, local_id: &str) -> Self {
        Self(format!("{group}-{local_id}"))
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FragmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FragmentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FragmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FragmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FragmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A predefined, reusable block of text offered for insertion
///
/// Created once at catalog load and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Globally unique composite id
    pub id: FragmentId,
    /// Literal text to insert
    pub content: String,
    /// Display category
    pub group: String,
}

impl Fragment {
    /// Content wrapped in bracket delimiters, as inserted into documents
    #[inline]
    #[must_use]
    pub fn wrapped(&self) -> String {
        format!("[{}]", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn compose_uses_hyphen() {
        assert_eq!(FragmentId::compose("Disclaimer", "3").as_str(), "Disclaimer-3");
    }

    #[test]
    fn set_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(FragmentId::from("A-1"));
        assert!(set.contains("A-1"));
        assert!(!set.contains("A-2"));
    }

    #[test]
    fn wrapped_content() {
        let fragment = Fragment {
            id: FragmentId::from("A-1"),
            content: "x".to_string(),
            group: "A".to_string(),
        };
        assert_eq!(fragment.wrapped(), "[x]");
    }
}
