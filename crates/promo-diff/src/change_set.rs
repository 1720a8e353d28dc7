//! The ordered output of a diff.

use promo_types::{ChangeKind, ChangeRecord};

/// The change records of one diff, in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet {
    /// The change records.
    pub changes: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of records of one kind.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    /// Number of `add` records.
    pub fn additions(&self) -> usize {
        self.count(ChangeKind::Add)
    }

    /// Number of `modify` records.
    pub fn modifications(&self) -> usize {
        self.count(ChangeKind::Modify)
    }

    /// Number of `delete` records.
    pub fn deletions(&self) -> usize {
        self.count(ChangeKind::Delete)
    }

    /// Number of `pending add` and `pending delete` records.
    pub fn pending(&self) -> usize {
        self.count(ChangeKind::PendingAdd) + self.count(ChangeKind::PendingDelete)
    }

    /// Records for one root object, in order.
    pub fn for_root<'a>(&'a self, root: &'a str) -> impl Iterator<Item = &'a ChangeRecord> + 'a {
        self.changes.iter().filter(move |c| c.root == root)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.changes.iter()
    }

    pub fn into_records(self) -> Vec<ChangeRecord> {
        self.changes
    }
}

impl From<Vec<ChangeRecord>> for ChangeSet {
    fn from(changes: Vec<ChangeRecord>) -> Self {
        Self { changes }
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeRecord;
    type IntoIter = std::vec::IntoIter<ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_types::comment;

    fn record(root: &str, kind: ChangeKind) -> ChangeRecord {
        ChangeRecord::new(root, kind, "", comment::MODIFIED)
    }

    #[test]
    fn empty_set() {
        let set = ChangeSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.pending(), 0);
    }

    #[test]
    fn counters_by_kind() {
        let set = ChangeSet::from(vec![
            record("a", ChangeKind::Add),
            record("a", ChangeKind::Modify),
            record("b", ChangeKind::Modify),
            record("b", ChangeKind::Delete),
            record("c", ChangeKind::PendingAdd),
            record("c", ChangeKind::PendingDelete),
        ]);
        assert_eq!(set.len(), 6);
        assert_eq!(set.additions(), 1);
        assert_eq!(set.modifications(), 2);
        assert_eq!(set.deletions(), 1);
        assert_eq!(set.pending(), 2);
    }

    #[test]
    fn records_for_root_keep_order() {
        let set = ChangeSet::from(vec![
            record("a", ChangeKind::Add),
            record("b", ChangeKind::Modify),
            record("a", ChangeKind::Delete),
        ]);
        let kinds: Vec<ChangeKind> = set.for_root("a").map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Add, ChangeKind::Delete]);
    }
}
