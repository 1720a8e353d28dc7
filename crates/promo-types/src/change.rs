//! Classified change records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::TypeError;

/// Review comments attached to change records.
///
/// Root-level records are recognised by their comment, so these strings are
/// part of the contract with the applier.
pub mod comment {
    pub const ROOT_ADDED: &str = "root object added";
    pub const ROOT_DELETED: &str = "root object deleted";
    pub const ADDED: &str = "Added";
    pub const DELETED: &str = "Deleted";
    pub const MODIFIED: &str = "Modified";
    pub const PROMOTION_PENDING: &str = "Promotion Pending";
    pub const DELETION_PENDING: &str = "Deletion Pending";
}

/// How a node changed between snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// New in the lower environment since the last promotion.
    Add,
    /// Changed in the lower environment since the last promotion.
    Modify,
    /// Removed from the lower environment since the last promotion.
    Delete,
    /// Present in the lower environment before and after, never promoted.
    PendingAdd,
    /// Still present in the higher environment after an earlier removal.
    PendingDelete,
}

impl ChangeKind {
    /// The change request string shown to reviewers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::PendingAdd => "pending add",
            Self::PendingDelete => "pending delete",
        }
    }

    /// `delete` and `pending delete`.
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete | Self::PendingDelete)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = TypeError;

    /// Accepts the review strings, their kebab-case forms, and the reviewer
    /// shorthand `pending` for a pending add.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "modify" => Ok(Self::Modify),
            "delete" => Ok(Self::Delete),
            "pending add" | "pending-add" | "pending" => Ok(Self::PendingAdd),
            "pending delete" | "pending-delete" => Ok(Self::PendingDelete),
            _ => Err(TypeError::UnknownChangeKind(s.to_string())),
        }
    }
}

/// A single change between the lower and higher environment snapshots.
///
/// `path` is the `//`-joined key path from the root object to the reported
/// node; it is empty for root-level additions and deletions. The four value
/// slots hold the node as seen in each snapshot (current/previous, lower and
/// higher); `cur_value_higher` is the value the higher environment receives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub root: String,
    pub kind: ChangeKind,
    pub path: String,
    pub cur_value_lower: Option<Document>,
    pub prev_value_lower: Option<Document>,
    pub cur_value_higher: Option<Document>,
    pub prev_value_higher: Option<Document>,
    pub comment: String,
}

impl ChangeRecord {
    /// A record with every value slot empty.
    pub fn new(
        root: impl Into<String>,
        kind: ChangeKind,
        path: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            kind,
            path: path.into(),
            cur_value_lower: None,
            prev_value_lower: None,
            cur_value_higher: None,
            prev_value_higher: None,
            comment: comment.into(),
        }
    }

    pub fn with_cur_lower(mut self, value: Option<Document>) -> Self {
        self.cur_value_lower = value;
        self
    }

    pub fn with_prev_lower(mut self, value: Option<Document>) -> Self {
        self.prev_value_lower = value;
        self
    }

    pub fn with_cur_higher(mut self, value: Option<Document>) -> Self {
        self.cur_value_higher = value;
        self
    }

    pub fn with_prev_higher(mut self, value: Option<Document>) -> Self {
        self.prev_value_higher = value;
        self
    }

    /// Whole-document addition ("root object added").
    pub fn is_root_added(&self) -> bool {
        self.path.trim().is_empty() && comment_is(&self.comment, comment::ROOT_ADDED)
    }

    /// Whole-document deletion ("root object deleted").
    pub fn is_root_deleted(&self) -> bool {
        self.path.trim().is_empty() && comment_is(&self.comment, comment::ROOT_DELETED)
    }
}

fn comment_is(comment: &str, expected: &str) -> bool {
    comment.trim().eq_ignore_ascii_case(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_round_trip() {
        for kind in [
            ChangeKind::Add,
            ChangeKind::Modify,
            ChangeKind::Delete,
            ChangeKind::PendingAdd,
            ChangeKind::PendingDelete,
        ] {
            assert_eq!(kind.as_str().parse::<ChangeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn reviewer_shorthand_pending_is_pending_add() {
        assert_eq!("pending".parse::<ChangeKind>().unwrap(), ChangeKind::PendingAdd);
        assert_eq!(" Pending-Delete ".parse::<ChangeKind>().unwrap(), ChangeKind::PendingDelete);
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = "rename".parse::<ChangeKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownChangeKind("rename".into()));
    }

    #[test]
    fn delete_kinds() {
        assert!(ChangeKind::Delete.is_delete());
        assert!(ChangeKind::PendingDelete.is_delete());
        assert!(!ChangeKind::PendingAdd.is_delete());
    }

    #[test]
    fn root_level_detection_ignores_case_and_whitespace() {
        let added = ChangeRecord::new("svc", ChangeKind::Add, "", " Root Object Added ");
        assert!(added.is_root_added());
        assert!(!added.is_root_deleted());

        let deleted = ChangeRecord::new("svc", ChangeKind::Delete, "", comment::ROOT_DELETED);
        assert!(deleted.is_root_deleted());

        let nested = ChangeRecord::new("svc", ChangeKind::Add, "image", comment::ROOT_ADDED);
        assert!(!nested.is_root_added());
    }

    #[test]
    fn builder_fills_value_slots() {
        let record = ChangeRecord::new("svc", ChangeKind::Modify, "", comment::MODIFIED)
            .with_cur_lower(Some(Document::from(4i64)))
            .with_prev_lower(Some(Document::from(2i64)));
        assert_eq!(record.cur_value_lower, Some(Document::from(4i64)));
        assert_eq!(record.prev_value_lower, Some(Document::from(2i64)));
        assert!(record.cur_value_higher.is_none());
    }
}
