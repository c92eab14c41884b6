//! Fragment usage tracking

use fragdoc_catalog::{FragmentId, UsageLookup};
use indexmap::IndexSet;

/// Ids of fragments inserted at least once
///
/// Grows monotonically within a session. Membership drives display only;
/// a used fragment can still be inserted again.
#[derive(Debug, Clone, Default)]
pub struct UsageSet {
    ids: IndexSet<FragmentId>,
}

impl UsageSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use; returns `true` on first use of `id`
    #[inline]
    pub fn insert(&mut self, id: FragmentId) -> bool {
        self.ids.insert(id)
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of distinct used fragments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing has been used
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Used ids in first-use order
    pub fn iter(&self) -> impl Iterator<Item = &FragmentId> {
        self.ids.iter()
    }
}

impl UsageLookup for UsageSet {
    fn is_used(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// Monotonic insertion counter and the derived usage ratio
///
/// The ratio is `insertions / catalog size` as a percentage rounded to two
/// decimals. Re-inserting a fragment counts again, so the ratio can exceed
/// 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageMeter {
    insertions: u64,
    ratio: f64,
}

impl UsageMeter {
    /// Create zeroed meter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one insertion and recompute the ratio against `total`
    ///
    /// Returns the new ratio.
    pub fn record(&mut self, total: usize) -> f64 {
        self.insertions += 1;
        self.ratio = percentage(self.insertions, total);
        self.ratio
    }

    /// Insertions performed so far
    #[inline]
    #[must_use]
    pub fn insertions(&self) -> u64 {
        self.insertions
    }

    /// Ratio as of the last insertion
    #[inline]
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn insert_is_idempotent() {
        let mut set = UsageSet::new();
        assert!(set.insert("A-1".into()));
        assert!(!set.insert("A-1".into()));
        assert_eq!(set.len(), 1);
        assert!(set.is_used("A-1"));
    }

    #[test]
    fn first_use_order() {
        let mut set = UsageSet::new();
        set.insert("B-1".into());
        set.insert("A-1".into());
        set.insert("B-1".into());
        let ids: Vec<_> = set.iter().map(FragmentId::as_str).collect();
        assert_eq!(ids, vec!["B-1", "A-1"]);
    }

    #[test]
    fn ratio_exceeds_hundred() {
        let mut meter = UsageMeter::new();
        meter.record(2);
        meter.record(2);
        let ratio = meter.record(2);
        assert_eq!(meter.insertions(), 3);
        assert!((ratio - 150.0).abs() < f64::EPSILON);
        assert_eq!(format!("{ratio:.2}"), "150.00");
    }

    #[test]
    fn ratio_rounds_to_two_decimals() {
        let mut meter = UsageMeter::new();
        let ratio = meter.record(3);
        assert!((ratio - 33.33).abs() < 1e-9);
        let ratio = meter.record(3);
        assert!((ratio - 66.67).abs() < 1e-9);
    }

    #[test]
    fn empty_catalog_ratio_is_zero() {
        let mut meter = UsageMeter::new();
        assert!(meter.record(0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_usage_set_only_grows(ids in proptest::collection::vec("[a-c]-[1-3]", 0..40)) {
            let mut set = UsageSet::new();
            let mut prev = 0;
            for id in ids {
                set.insert(FragmentId::from(id.as_str()));
                prop_assert!(set.len() >= prev);
                prop_assert!(set.contains(&id));
                prev = set.len();
            }
        }
    }
}
