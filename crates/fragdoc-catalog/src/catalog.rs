//! Catalog loading, lookup and grouping

use crate::error::CatalogError;
use crate::fragment::{Fragment, FragmentId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Group-local fragment id as it appears in source data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric id, rendered in decimal
    Number(i64),
    /// Text id, used verbatim
    Text(String),
}

impl Display for RawId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Un-flattened fragment as supplied per group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFragment {
    /// Id unique within its group
    pub id: RawId,
    /// Literal text
    pub content: String,
}

impl RawFragment {
    /// Create raw fragment
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<RawId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Create raw fragment with a numeric id
    #[inline]
    #[must_use]
    pub fn numbered(id: i64, content: impl Into<String>) -> Self {
        Self::new(RawId::Number(id), content)
    }
}

/// Ordered mapping from group name to its raw fragments
pub type RawGroups = IndexMap<String, Vec<RawFragment>>;

/// Accepted catalog document shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped {
        #[serde(rename = "predefinedItem")]
        predefined_item: RawGroups,
    },
    Bare(RawGroups),
}

/// Membership test for fragments that have been inserted at least once
pub trait UsageLookup {
    /// Whether `id` has been used
    fn is_used(&self, id: &str) -> bool;
}

impl UsageLookup for HashSet<FragmentId> {
    fn is_used(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl UsageLookup for HashSet<String> {
    fn is_used(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// Read-only, ordered fragment catalog
///
/// Iteration order is input group order, then item order within group.
/// Colliding composite ids are kept; lookup by id resolves to the first
/// occurrence and the collision is reported via [`Self::collisions`].
#[derive(Debug, Clone, Default)]
pub struct FragmentCatalog {
    fragments: Vec<Fragment>,
    /// Composite id → index of first occurrence
    index: HashMap<FragmentId, usize>,
    collisions: Vec<FragmentId>,
}

impl FragmentCatalog {
    /// Flatten raw groups into a catalog
    #[must_use]
    pub fn load(raw: RawGroups) -> Self {
        let mut fragments = Vec::new();
        let mut index = HashMap::new();
        let mut collisions = Vec::new();

        for (group, items) in raw {
            for item in items {
                let id = FragmentId::compose(&group, &item.id.to_string());
                match index.entry(id.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(fragments.len());
                    }
                    Entry::Occupied(_) => {
                        tracing::warn!(id = %id, group = %group, "duplicate fragment id in catalog input");
                        collisions.push(id.clone());
                    }
                }
                fragments.push(Fragment {
                    id,
                    content: item.content,
                    group: group.clone(),
                });
            }
        }

        tracing::debug!(fragments = fragments.len(), "fragment catalog loaded");
        Self {
            fragments,
            index,
            collisions,
        }
    }

    /// Parse a catalog from JSON
    ///
    /// Accepts either a bare group map or `{"predefinedItem": {...}}`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Json`] if the input matches neither shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let groups = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::Wrapped { predefined_item } => predefined_item,
            CatalogDocument::Bare(groups) => groups,
        };
        Ok(Self::load(groups))
    }

    /// Read and parse a catalog file
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read, or
    /// [`CatalogError::Json`] if it does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Resolve a fragment by composite id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Fragment> {
        self.index.get(id).map(|&i| &self.fragments[i])
    }

    /// Check if id resolves
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All fragments in catalog order
    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Iterate fragments in catalog order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Total fragment count, colliding entries included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Ids that appeared more than once in the input
    #[inline]
    #[must_use]
    pub fn collisions(&self) -> &[FragmentId] {
        &self.collisions
    }

    /// Fragments grouped by category, first-seen group order
    #[must_use]
    pub fn groups(&self) -> IndexMap<&str, Vec<&Fragment>> {
        group_by(&self.fragments)
    }

    /// Count of fragments in `group` not yet used
    #[must_use]
    pub fn unused_in_group(&self, group: &str, usage: &impl UsageLookup) -> usize {
        self.fragments
            .iter()
            .filter(|f| f.group == group && !usage.is_used(f.id.as_str()))
            .count()
    }
}

impl<'a> IntoIterator for &'a FragmentCatalog {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

/// Group fragments by category, preserving first-seen group order
#[must_use]
pub fn group_by(fragments: &[Fragment]) -> IndexMap<&str, Vec<&Fragment>> {
    let mut groups: IndexMap<&str, Vec<&Fragment>> = IndexMap::new();
    for fragment in fragments {
        groups.entry(fragment.group.as_str()).or_default().push(fragment);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(groups: Vec<(&str, Vec<(i64, &str)>)>) -> RawGroups {
        groups
            .into_iter()
            .map(|(g, items)| {
                let items = items.into_iter().map(|(id, c)| RawFragment::new(id, c)).collect();
                (g.to_string(), items)
            })
            .collect()
    }

    #[test]
    fn single_fragment() {
        let catalog = FragmentCatalog::load(raw(vec![("A", vec![(1, "x")])]));

        assert_eq!(catalog.len(), 1);
        let f = &catalog.fragments()[0];
        assert_eq!(f.id.as_str(), "A-1");
        assert_eq!(f.content, "x");
        assert_eq!(f.group, "A");
    }

    #[test]
    fn order_is_group_then_item() {
        let catalog = FragmentCatalog::load(raw(vec![
            ("Zeta", vec![(2, "z2"), (1, "z1")]),
            ("Alpha", vec![(1, "a1")]),
        ]));

        let ids: Vec<_> = catalog.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["Zeta-2", "Zeta-1", "Alpha-1"]);
    }

    #[test]
    fn collisions_are_kept() {
        let catalog = FragmentCatalog::load(raw(vec![("A", vec![(1, "first"), (1, "second")])]));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.collisions(), &[FragmentId::from("A-1")]);
        assert_eq!(catalog.get("A-1").unwrap().content, "first");
    }

    #[test]
    fn cross_group_composite_collision() {
        // "A-1" + "2" and "A" + "1-2" both compose to "A-1-2"
        let mut groups = RawGroups::new();
        groups.insert("A-1".into(), vec![RawFragment::numbered(2, "p")]);
        groups.insert("A".into(), vec![RawFragment::new("1-2", "q")]);
        let catalog = FragmentCatalog::load(groups);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.collisions().len(), 1);
    }

    #[test]
    fn lookup_unknown() {
        let catalog = FragmentCatalog::load(raw(vec![("A", vec![(1, "x")])]));
        assert!(catalog.get("B-1").is_none());
        assert!(!catalog.contains("A-2"));
    }

    #[test]
    fn json_wrapped_shape() {
        let json = r#"{
            "predefinedItem": {
                "Dynamic Data fields": [{"id": 1, "content": "Claim number"}],
                "Disclaimer": [{"id": "d1", "content": "No warranty"}]
            }
        }"#;
        let catalog = FragmentCatalog::from_json(json).unwrap();

        let ids: Vec<_> = catalog.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["Dynamic Data fields-1", "Disclaimer-d1"]);
    }

    #[test]
    fn json_bare_shape_preserves_order() {
        let json = r#"{"B": [{"id": 1, "content": "b"}], "A": [{"id": 1, "content": "a"}]}"#;
        let catalog = FragmentCatalog::from_json(json).unwrap();

        let groups: Vec<_> = catalog.groups().keys().copied().collect();
        assert_eq!(groups, vec!["B", "A"]);
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(matches!(
            FragmentCatalog::from_json("[1, 2]"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn group_by_first_seen_order() {
        let fragments = vec![
            Fragment { id: "B-1".into(), content: "1".into(), group: "B".into() },
            Fragment { id: "A-1".into(), content: "2".into(), group: "A".into() },
            Fragment { id: "B-2".into(), content: "3".into(), group: "B".into() },
        ];
        let groups = group_by(&fragments);

        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(groups["B"].len(), 2);
        assert_eq!(groups["B"][1].content, "3");
    }

    #[test]
    fn unused_counts() {
        let catalog = FragmentCatalog::load(raw(vec![
            ("A", vec![(1, "x"), (2, "y")]),
            ("B", vec![(1, "z")]),
        ]));
        let mut used: HashSet<FragmentId> = HashSet::new();
        used.insert("A-2".into());

        assert_eq!(catalog.unused_in_group("A", &used), 1);
        assert_eq!(catalog.unused_in_group("B", &used), 1);
        assert_eq!(catalog.unused_in_group("missing", &used), 0);
    }
}
