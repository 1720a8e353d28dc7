//! Folding reviewed change records into a snapshot.
//!
//! The applier clones the base snapshot and replays records in the order the
//! reviewer supplied them. Later records may rely on containers created by
//! earlier ones, so the order is never changed.

use std::collections::{BTreeMap, BTreeSet};

use promo_types::{path, ChangeKind, ChangeRecord, Document, Snapshot};
use tracing::{debug, info, warn};

use crate::config::ApplyConfig;
use crate::error::{ApplyError, ApplyResult};
use crate::list_entry;

/// The result of one apply run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyOutcome {
    /// The updated snapshot.
    pub snapshot: Snapshot,
    /// Roots removed by "root object deleted" records, in record order.
    pub deleted_roots: Vec<String>,
    /// Roots created by "root object added" records, in record order.
    pub added_roots: Vec<String>,
    /// Roots touched by a non-delete record, sorted. Reserved pseudo-roots
    /// are not listed.
    pub upgraded_roots: Vec<String>,
}

/// Applies change records to a copy of a base snapshot.
#[derive(Clone, Debug, Default)]
pub struct ChangeApplier {
    config: ApplyConfig,
}

impl ChangeApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ApplyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApplyConfig {
        &self.config
    }

    /// Apply `changes` in order to a clone of `base`.
    ///
    /// Fails on the first record that cannot be applied; `base` is never
    /// touched, so a failed run leaves nothing half-written.
    pub fn apply(&self, base: &Snapshot, changes: &[ChangeRecord]) -> ApplyResult<ApplyOutcome> {
        let mut outcome = ApplyOutcome {
            snapshot: base.clone(),
            ..Default::default()
        };
        let mut upgraded = BTreeSet::new();

        for (index, record) in changes.iter().enumerate() {
            let row = index + 1;
            self.apply_record(row, record, &mut outcome)?;
            if !record.kind.is_delete() && !self.config.is_reserved(&record.root) {
                upgraded.insert(record.root.clone());
            }
        }

        outcome.upgraded_roots = upgraded.into_iter().collect();
        info!(
            records = changes.len(),
            roots = outcome.snapshot.len(),
            deleted = outcome.deleted_roots.len(),
            added = outcome.added_roots.len(),
            upgraded = outcome.upgraded_roots.len(),
            "apply complete"
        );
        Ok(outcome)
    }

    fn apply_record(&self, row: usize, record: &ChangeRecord, outcome: &mut ApplyOutcome) -> ApplyResult<()> {
        let root = record.root.as_str();

        if record.is_root_deleted() {
            if outcome.snapshot.remove(root).is_some() {
                debug!(row, root, "deleted root object");
                outcome.deleted_roots.push(root.to_string());
            } else {
                debug!(row, root, "root object to delete is not present");
            }
            return Ok(());
        }

        if record.is_root_added() {
            let doc = outcome.snapshot.entry_or_insert(root, Document::empty_object());
            if let Some(value) = record.cur_value_higher.as_ref().filter(|v| !v.is_blank()) {
                *doc = value.clone();
            }
            debug!(row, root, "added root object");
            if !outcome.added_roots.iter().any(|r| r == root) {
                outcome.added_roots.push(root.to_string());
            }
            return Ok(());
        }

        let payload = resolve_payload(row, record)?;
        let segments = path::split(&record.path);

        if segments.is_empty() {
            if !self.config.is_reserved(root) {
                return Err(ApplyError::MissingKey {
                    row,
                    root: root.to_string(),
                });
            }
            return self.apply_reserved(row, record, payload, &mut outcome.snapshot);
        }

        let Some((last, parents)) = segments.split_last() else {
            return Err(ApplyError::MissingKey {
                row,
                root: root.to_string(),
            });
        };

        let mut node = outcome.snapshot.entry_or_insert(root, Document::empty_object());
        for segment in parents {
            node = object_mut(node, root).entry(segment.to_string()).or_insert_with(Document::empty_object);
        }
        let parent = object_mut(node, root);

        let named_rule = self.config.is_named_list_path(&segments);
        apply_at_key(parent, last, record, payload, named_rule);
        debug!(row, root, path = %record.path, kind = %record.kind, "applied change");
        Ok(())
    }

    /// A record for a reserved pseudo-root whose document is a list of
    /// named entries.
    fn apply_reserved(
        &self,
        row: usize,
        record: &ChangeRecord,
        payload: Option<&Document>,
        snapshot: &mut Snapshot,
    ) -> ApplyResult<()> {
        let Some(payload) = payload else {
            debug!(row, root = %record.root, "delete without a payload; nothing to remove");
            return Ok(());
        };
        let doc = snapshot.entry_or_insert(&record.root, Document::List(Vec::new()));
        let found = doc.kind_name();
        let Some(entries) = doc.as_list_mut() else {
            return Err(ApplyError::Validation {
                row,
                root: record.root.clone(),
                path: record.path.clone(),
                reason: format!("reserved root holds {found}, expected a list of entries"),
            });
        };
        list_entry::apply(entries, record.kind, payload);
        Ok(())
    }
}

/// The value a record writes, or for deletes the value identifying what to
/// remove.
///
/// Writes must carry a non-blank higher value. Deletes fall back from the
/// current higher value to the previous higher value, then the previous lower
/// value, and may carry none at all.
fn resolve_payload(row: usize, record: &ChangeRecord) -> ApplyResult<Option<&Document>> {
    fn usable(value: &Option<Document>) -> Option<&Document> {
        value.as_ref().filter(|v| !v.is_blank())
    }

    if record.kind.is_delete() {
        return Ok(usable(&record.cur_value_higher)
            .or_else(|| usable(&record.prev_value_higher))
            .or_else(|| usable(&record.prev_value_lower)));
    }

    match usable(&record.cur_value_higher) {
        Some(value) => Ok(Some(value)),
        None => Err(ApplyError::Validation {
            row,
            root: record.root.clone(),
            path: record.path.clone(),
            reason: "missing or empty value for the higher environment".to_string(),
        }),
    }
}

/// The map of an object node; any other node is replaced by an empty object.
fn object_mut<'a>(node: &'a mut Document, root: &str) -> &'a mut BTreeMap<String, Document> {
    if !node.is_object() {
        warn!(root, found = node.kind_name(), "replacing non-object container with an object");
        *node = Document::empty_object();
    }
    match node {
        Document::Object(map) => map,
        _ => unreachable!("node was just made an object"),
    }
}

/// Whether a record changes one element of the list at its key rather than
/// the key itself. Element records carry an object and, when the diff
/// filled it, a previous value that is not itself the whole list.
fn addresses_element(record: &ChangeRecord, payload: &Document) -> bool {
    payload.is_object() && !record.prev_value_lower.as_ref().is_some_and(Document::is_list)
}

/// Apply one record to `key` of `parent`.
fn apply_at_key(
    parent: &mut BTreeMap<String, Document>,
    key: &str,
    record: &ChangeRecord,
    payload: Option<&Document>,
    named_rule: bool,
) {
    let Some(payload) = payload else {
        parent.remove(key);
        return;
    };
    let kind = record.kind;

    if named_rule && !parent.contains_key(key) && list_entry::is_named_payload(payload) {
        if !kind.is_delete() {
            let mut entries = Vec::new();
            list_entry::apply(&mut entries, ChangeKind::Add, payload);
            parent.insert(key.to_string(), Document::List(entries));
        }
        return;
    }

    if !parent.get(key).is_some_and(Document::is_list) {
        if kind.is_delete() {
            parent.remove(key);
        } else {
            parent.insert(key.to_string(), payload.clone());
        }
        return;
    }
    let element = addresses_element(record, payload);
    let Some(items) = parent.get_mut(key).and_then(Document::as_list_mut) else {
        return;
    };

    if kind.is_delete() {
        if named_rule && list_entry::is_named_payload(payload) {
            list_entry::remove(items, &list_entry::payload_names(payload));
            if items.is_empty() {
                parent.remove(key);
            }
        } else if element {
            remove_element(items, key, payload);
        } else {
            parent.remove(key);
        }
        return;
    }

    if !element {
        parent.insert(key.to_string(), payload.clone());
        return;
    }
    match kind {
        ChangeKind::Add | ChangeKind::PendingAdd => {
            if payload.name().is_some() {
                list_entry::insert(items, payload);
            } else {
                items.push(payload.clone());
            }
        }
        ChangeKind::Modify => replace_element(items, key, record, payload),
        ChangeKind::Delete | ChangeKind::PendingDelete => {}
    }
}

/// Remove the entry named like `element`, or the first element equal to it.
fn remove_element(items: &mut Vec<Document>, key: &str, element: &Document) {
    let removed = match element.name() {
        Some(name) => list_entry::remove(items, &BTreeSet::from([name])),
        None => match items.iter().position(|item| item == element) {
            Some(at) => {
                items.remove(at);
                1
            }
            None => 0,
        },
    };
    if removed == 0 {
        warn!(key, "no list element matches the delete payload");
    }
}

/// Replace the entry named like `value`, else the element equal to the
/// record's previous value, else append `value`.
fn replace_element(items: &mut Vec<Document>, key: &str, record: &ChangeRecord, value: &Document) {
    if list_entry::replace(items, value) {
        return;
    }
    let slot = [record.prev_value_lower.as_ref(), record.prev_value_higher.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|previous| items.iter().position(|item| item == previous));
    match slot {
        Some(at) => items[at] = value.clone(),
        None => {
            warn!(key, "no list element matches the modified value; appending it");
            items.push(value.clone());
        }
    }
}
