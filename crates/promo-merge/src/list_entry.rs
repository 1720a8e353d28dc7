//! Named-entry operations on lists of objects.
//!
//! Used for the reserved pseudo-roots (`data`, `env`), whose whole document is
//! a list of `{name, value}` entries, and for named lists nested inside root
//! objects. Entries are matched by their `name` field only; conflicts warn
//! and never fail.

use std::collections::BTreeSet;

use promo_types::{ChangeKind, Document};
use tracing::{debug, warn};

/// Append `entry` unless an entry with the same name is already present.
/// Returns `true` if the list grew.
pub fn insert(list: &mut Vec<Document>, entry: &Document) -> bool {
    let exists = match entry.name() {
        Some(name) => list.iter().any(|e| e.name().as_deref() == Some(name.as_str())),
        None => list.contains(entry),
    };
    if exists {
        warn!(name = ?entry.name(), "entry already present; not added again");
        return false;
    }
    list.push(entry.clone());
    true
}

/// Merge the fields of `entry` into the entry with the same name.
/// Returns `false` if there is no such entry.
pub fn merge(list: &mut [Document], entry: &Document) -> bool {
    let (Some(name), Some(fields)) = (entry.name(), entry.as_object()) else {
        warn!("modify payload is not a named object; ignored");
        return false;
    };
    let target = list
        .iter_mut()
        .find(|e| e.name().as_deref() == Some(name.as_str()))
        .and_then(Document::as_object_mut);
    match target {
        Some(existing) => {
            for (key, value) in fields {
                existing.insert(key.clone(), value.clone());
            }
            true
        }
        None => {
            warn!(name = %name, "attempted to modify a missing entry");
            false
        }
    }
}

/// Replace the entry with the same name as `entry` by `entry` itself.
/// Returns `false` if `entry` is unnamed or no entry has its name.
pub fn replace(list: &mut [Document], entry: &Document) -> bool {
    let Some(name) = entry.name() else {
        return false;
    };
    match list.iter_mut().find(|e| e.name().as_deref() == Some(name.as_str())) {
        Some(existing) => {
            *existing = entry.clone();
            true
        }
        None => false,
    }
}

/// Remove every entry whose name is in `names`. Returns how many went.
pub fn remove(list: &mut Vec<Document>, names: &BTreeSet<String>) -> usize {
    let before = list.len();
    list.retain(|e| !e.name().is_some_and(|name| names.contains(&name)));
    before - list.len()
}

/// The names carried by a delete payload: one named object or a list of them.
pub fn payload_names(payload: &Document) -> BTreeSet<String> {
    match payload {
        Document::List(items) => items.iter().filter_map(Document::name).collect(),
        other => other.name().into_iter().collect(),
    }
}

/// Whether `payload` identifies named entries: an object with a name, or a
/// non-empty list made only of such objects.
pub fn is_named_payload(payload: &Document) -> bool {
    match payload {
        Document::List(items) => !items.is_empty() && items.iter().all(|i| i.is_object() && i.name().is_some()),
        Document::Object(_) => payload.name().is_some(),
        Document::Scalar(_) => false,
    }
}

/// Apply one change to a list of named entries.
///
/// `add` and `pending add` insert (every element when the payload is a
/// list), `modify` merges by name, and both delete kinds remove by name.
pub fn apply(list: &mut Vec<Document>, kind: ChangeKind, payload: &Document) {
    match kind {
        ChangeKind::Add | ChangeKind::PendingAdd => {
            let added = match payload {
                Document::List(items) => items.iter().filter(|item| insert(list, item)).count(),
                entry => usize::from(insert(list, entry)),
            };
            debug!(added, "inserted named entries");
        }
        ChangeKind::Modify => {
            merge(list, payload);
        }
        ChangeKind::Delete | ChangeKind::PendingDelete => {
            let removed = remove(list, &payload_names(payload));
            debug!(removed, "removed named entries");
        }
    }
}
