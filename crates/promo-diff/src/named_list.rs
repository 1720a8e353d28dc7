//! Identity-keyed comparison of named lists.
//!
//! Kubernetes-style collections (env vars, config entries) are lists of
//! objects identified by their `name` field. Comparing them by position
//! would report a reorder as a change, so they are reduced to maps keyed by
//! name and classified exactly like object keys. Elements without a name are
//! compared by position among themselves.

use std::collections::{BTreeMap, BTreeSet};

use promo_types::{comment, ChangeKind, ChangeRecord, Document};
use tracing::warn;

use crate::engine::DiffEngine;

/// The elements of one list, split by whether they carry a name.
struct Keyed<'a> {
    named: BTreeMap<String, &'a Document>,
    unnamed: Vec<Document>,
}

fn index_by_name<'a>(items: &'a [Document], root: &str, list_path: &str) -> Keyed<'a> {
    let mut named = BTreeMap::new();
    let mut unnamed = Vec::new();
    for item in items {
        match item.name() {
            Some(name) => {
                if named.insert(name.clone(), item).is_some() {
                    warn!(root, path = list_path, name = %name, "duplicate name in list; last entry wins");
                }
            }
            None => unnamed.push(item.clone()),
        }
    }
    Keyed { named, unnamed }
}

impl DiffEngine {
    /// Compare lists whose elements are identified by `name`. Records name
    /// the list; the element travels in the value slots.
    pub(crate) fn compare_named_list(
        &self,
        old_items: &[Document],
        new_items: &[Document],
        high_items: &[Document],
        root: &str,
        list_path: &str,
    ) -> Vec<ChangeRecord> {
        let old = index_by_name(old_items, root, list_path);
        let new = index_by_name(new_items, root, list_path);
        let high = index_by_name(high_items, root, list_path);

        let names: BTreeSet<&String> = old
            .named
            .keys()
            .chain(new.named.keys())
            .chain(high.named.keys())
            .collect();

        let mut changes = Vec::new();
        for name in names {
            let old_item = old.named.get(name).copied();
            let new_item = new.named.get(name).copied();
            let high_item = high.named.get(name).copied();

            let record = |kind: ChangeKind, note: &str| ChangeRecord::new(root, kind, list_path, note);

            match (old_item, new_item, high_item) {
                (Some(o), None, h) => changes.push(
                    record(ChangeKind::Delete, comment::DELETED)
                        .with_prev_lower(Some(o.clone()))
                        .with_prev_higher(h.cloned()),
                ),
                (None, None, Some(h)) => changes.push(
                    record(ChangeKind::PendingDelete, comment::DELETION_PENDING)
                        .with_prev_higher(Some(h.clone())),
                ),
                (o, Some(n), None) => {
                    let (kind, note) = match o {
                        None => (ChangeKind::Add, comment::ADDED),
                        Some(_) => (ChangeKind::PendingAdd, comment::PROMOTION_PENDING),
                    };
                    changes.push(
                        record(kind, note)
                            .with_cur_lower(Some(n.clone()))
                            .with_cur_higher(Some(self.higher_value(None, n))),
                    );
                }
                (Some(o), Some(n), Some(h)) if o != n => changes.push(
                    record(ChangeKind::Modify, comment::MODIFIED)
                        .with_cur_lower(Some(n.clone()))
                        .with_prev_lower(Some(o.clone()))
                        .with_cur_higher(Some(self.higher_value(None, n)))
                        .with_prev_higher(Some(h.clone())),
                ),
                _ => {}
            }
        }

        if !old.unnamed.is_empty() || !new.unnamed.is_empty() {
            changes.extend(self.compare_positional(
                &old.unnamed,
                &new.unnamed,
                &high.unnamed,
                root,
                list_path,
            ));
        }

        changes
    }
}
