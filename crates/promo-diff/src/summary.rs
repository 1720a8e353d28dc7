//! Per-service promotion summary.

use std::collections::BTreeMap;
use std::fmt;

use promo_types::Snapshot;
use serde::{Deserialize, Serialize};

use crate::change_set::ChangeSet;

/// What a promotion does to one root object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    NewService,
    DeletedService,
    Updated,
    NoModifications,
}

impl ServiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewService => "New service",
            Self::DeletedService => "Deleted service",
            Self::Updated => "Updated",
            Self::NoModifications => "No modifications",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of every root in either lower snapshot.
pub fn summarize(
    lower_prev: &Snapshot,
    lower_cur: &Snapshot,
    changes: &ChangeSet,
) -> BTreeMap<String, ServiceStatus> {
    let mut summary: BTreeMap<String, ServiceStatus> = lower_prev
        .names()
        .chain(lower_cur.names())
        .map(|root| (root.to_string(), ServiceStatus::NoModifications))
        .collect();

    for record in changes {
        let status = if record.is_root_added() {
            ServiceStatus::NewService
        } else if record.is_root_deleted() {
            ServiceStatus::DeletedService
        } else {
            ServiceStatus::Updated
        };
        let entry = summary
            .entry(record.root.clone())
            .or_insert(ServiceStatus::NoModifications);
        // Whole-document statuses win over field-level updates.
        if matches!(*entry, ServiceStatus::NoModifications | ServiceStatus::Updated) {
            *entry = status;
        }
    }

    summary
}
