//! Recursive three-way comparison of snapshots.
//!
//! Three snapshots take part in every diff:
//!
//! - `lower_prev`: the lower environment at the last promotion
//! - `lower_cur`: the lower environment now
//! - `higher_prev`: the higher environment before this promotion
//!
//! Object keys are classified against all three; the higher snapshot is what
//! turns a plain two-way diff into one that also reports changes made in an
//! earlier cycle but never promoted.

use std::collections::{BTreeMap, BTreeSet};

use promo_types::{comment, path, ChangeKind, ChangeRecord, Document, EnvPair, Snapshot};
use tracing::{debug, info};

use crate::change_set::ChangeSet;
use crate::config::DiffConfig;
use crate::transform::{IdentityTransform, ValueTransform};

/// Three-way diff engine.
///
/// The engine holds no per-run state: every comparison returns its own
/// records and callers concatenate them.
pub struct DiffEngine {
    pub(crate) envs: EnvPair,
    pub(crate) config: DiffConfig,
    pub(crate) transform: Box<dyn ValueTransform>,
}

impl DiffEngine {
    /// An engine with the default config and no value rewriting.
    pub fn new(envs: EnvPair) -> Self {
        Self {
            envs,
            config: DiffConfig::default(),
            transform: Box::new(IdentityTransform),
        }
    }

    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_transform(mut self, transform: impl ValueTransform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    pub fn envs(&self) -> &EnvPair {
        &self.envs
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Diff three snapshots.
    ///
    /// Roots new in `lower_cur` are reported whole as "root object added",
    /// roots gone from `lower_cur` as "root object deleted", and roots present
    /// in both lower snapshots are compared recursively.
    pub fn diff(&self, lower_prev: &Snapshot, lower_cur: &Snapshot, higher_prev: &Snapshot) -> ChangeSet {
        let mut changes = Vec::new();

        for (root, new_doc) in lower_cur.iter() {
            match lower_prev.get(root) {
                None => {
                    debug!(root, "root object added");
                    changes.push(
                        ChangeRecord::new(root, ChangeKind::Add, "", comment::ROOT_ADDED)
                            .with_cur_lower(Some(new_doc.clone()))
                            .with_cur_higher(Some(self.higher_value(None, new_doc))),
                    );
                }
                Some(old_doc) => {
                    let records = self.compare_node(old_doc, new_doc, higher_prev.get(root), root, "");
                    debug!(root, changes = records.len(), "compared root object");
                    changes.extend(records);
                }
            }
        }

        for (root, old_doc) in lower_prev.iter() {
            if !lower_cur.contains(root) {
                debug!(root, "root object deleted");
                changes.push(
                    ChangeRecord::new(root, ChangeKind::Delete, "", comment::ROOT_DELETED)
                        .with_prev_lower(Some(old_doc.clone()))
                        .with_prev_higher(higher_prev.get(root).cloned()),
                );
            }
        }

        let set = ChangeSet { changes };
        info!(
            envs = %self.envs,
            total = set.len(),
            additions = set.additions(),
            modifications = set.modifications(),
            deletions = set.deletions(),
            pending = set.pending(),
            "diff complete"
        );
        set
    }

    /// Compare one node of the lower environment, before and after, against
    /// the higher environment's node at the same path.
    pub fn compare_node(
        &self,
        old_lower: &Document,
        new_lower: &Document,
        old_higher: Option<&Document>,
        root: &str,
        node_path: &str,
    ) -> Vec<ChangeRecord> {
        match (old_lower, new_lower) {
            (Document::Object(old_map), Document::Object(new_map)) => {
                let high_map = old_higher.and_then(Document::as_object);
                self.compare_objects(old_map, new_map, high_map, root, node_path)
            }
            (Document::List(old_items), Document::List(new_items))
                if old_items.iter().all(Document::is_object)
                    && new_items.iter().all(Document::is_object) =>
            {
                let high_items = old_higher.and_then(Document::as_list).unwrap_or_default();
                if is_named(old_items) && is_named(new_items) {
                    self.compare_named_list(old_items, new_items, high_items, root, node_path)
                } else {
                    self.compare_positional(old_items, new_items, high_items, root, node_path)
                }
            }
            _ => self.compare_scalars(old_lower, new_lower, old_higher, root, node_path),
        }
    }

    fn compare_objects(
        &self,
        old_map: &BTreeMap<String, Document>,
        new_map: &BTreeMap<String, Document>,
        high_map: Option<&BTreeMap<String, Document>>,
        root: &str,
        node_path: &str,
    ) -> Vec<ChangeRecord> {
        let mut keys: BTreeSet<&String> = old_map.keys().chain(new_map.keys()).collect();
        if let Some(high) = high_map {
            keys.extend(high.keys());
        }

        let mut changes = Vec::new();
        for key in keys {
            let child_path = path::child(node_path, key);
            let old_val = old_map.get(key);
            let new_val = new_map.get(key);
            let high_val = high_map.and_then(|high| high.get(key));

            match (old_val, new_val, high_val) {
                (Some(old), None, high) => changes.push(
                    self.record(root, ChangeKind::Delete, &child_path, comment::DELETED)
                        .with_prev_lower(Some(old.clone()))
                        .with_prev_higher(high.cloned()),
                ),
                (None, None, Some(high)) => changes.push(
                    self.record(root, ChangeKind::PendingDelete, &child_path, comment::DELETION_PENDING)
                        .with_prev_higher(Some(high.clone())),
                ),
                (old, Some(new), None) => {
                    let (kind, note) = match old {
                        None => (ChangeKind::Add, comment::ADDED),
                        Some(_) => (ChangeKind::PendingAdd, comment::PROMOTION_PENDING),
                    };
                    changes.push(
                        self.record(root, kind, &child_path, note)
                            .with_cur_lower(Some(new.clone()))
                            .with_cur_higher(Some(self.higher_value(Some(key.as_str()), new))),
                    );
                }
                (Some(old), Some(new), high) => {
                    changes.extend(self.compare_node(old, new, high, root, &child_path));
                }
                // Added in the lower environment and already present above.
                (None, Some(_), Some(_)) | (None, None, None) => {}
            }
        }
        changes
    }

    /// Element-by-element comparison for lists without a usable identity key.
    /// Records name the list itself.
    pub(crate) fn compare_positional(
        &self,
        old_items: &[Document],
        new_items: &[Document],
        high_items: &[Document],
        root: &str,
        node_path: &str,
    ) -> Vec<ChangeRecord> {
        let mut changes = Vec::new();

        for (i, old) in old_items.iter().enumerate() {
            let high = high_items.get(i).cloned();
            match new_items.get(i) {
                Some(new) if new != old => changes.push(
                    ChangeRecord::new(root, ChangeKind::Modify, node_path, comment::MODIFIED)
                        .with_cur_lower(Some(new.clone()))
                        .with_prev_lower(Some(old.clone()))
                        .with_cur_higher(Some(self.higher_value(None, new)))
                        .with_prev_higher(high),
                ),
                Some(_) => {}
                None => changes.push(
                    ChangeRecord::new(root, ChangeKind::Delete, node_path, comment::DELETED)
                        .with_prev_lower(Some(old.clone()))
                        .with_prev_higher(high),
                ),
            }
        }

        for new in new_items.iter().skip(old_items.len()) {
            changes.push(
                ChangeRecord::new(root, ChangeKind::Add, node_path, comment::ADDED)
                    .with_cur_lower(Some(new.clone()))
                    .with_cur_higher(Some(self.higher_value(None, new))),
            );
        }

        changes
    }

    /// Leaves, scalar lists, and nodes whose kind changed between snapshots.
    fn compare_scalars(
        &self,
        old_lower: &Document,
        new_lower: &Document,
        old_higher: Option<&Document>,
        root: &str,
        node_path: &str,
    ) -> Vec<ChangeRecord> {
        if old_lower == new_lower {
            return Vec::new();
        }
        let field = Some(path::leaf(node_path)).filter(|f| !f.is_empty());
        vec![self
            .record(root, ChangeKind::Modify, node_path, comment::MODIFIED)
            .with_cur_lower(Some(new_lower.clone()))
            .with_prev_lower(Some(old_lower.clone()))
            .with_cur_higher(Some(self.higher_value(field, new_lower)))
            .with_prev_higher(old_higher.cloned())]
    }

    /// A record for the node at `node_path`, located per the path style.
    fn record(&self, root: &str, kind: ChangeKind, node_path: &str, note: &str) -> ChangeRecord {
        ChangeRecord::new(root, kind, self.config.path_style.locate(node_path), note)
    }

    pub(crate) fn higher_value(&self, field: Option<&str>, value: &Document) -> Document {
        self.transform.transform(field, value, &self.envs)
    }
}

/// A non-empty list whose first element carries a `name` key.
fn is_named(items: &[Document]) -> bool {
    items
        .first()
        .is_some_and(|first| first.contains_key(promo_types::document::NAME_KEY))
}

/// Diff three snapshots with the default engine.
pub fn diff_snapshots(
    lower_prev: &Snapshot,
    lower_cur: &Snapshot,
    higher_prev: &Snapshot,
    envs: EnvPair,
) -> ChangeSet {
    DiffEngine::new(envs).diff(lower_prev, lower_cur, higher_prev)
}
