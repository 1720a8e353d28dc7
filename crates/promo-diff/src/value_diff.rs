//! Line-level rendering of a value change.
//!
//! Large values (whole root objects, long lists) are easier to review as a
//! unified diff of their pretty JSON than side by side.

use promo_types::Document;
use similar::{ChangeTag, TextDiff};

/// Unchanged lines kept around each hunk.
const CONTEXT_LINES: usize = 3;

/// A unified line diff between two renderings of a value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueDiff {
    /// Hunk headers followed by their lines, in output order.
    pub lines: Vec<DiffLine>,
}

impl ValueDiff {
    /// Returns `true` if the two values render identically.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.count(|line| matches!(line, DiffLine::Added(_)))
    }

    pub fn deletions(&self) -> usize {
        self.count(|line| matches!(line, DiffLine::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&DiffLine) -> bool) -> usize {
        self.lines.iter().filter(|line| pred(line)).count()
    }
}

/// One line of a unified diff, without its trailing newline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// An `@@ -a,b +c,d @@` hunk header.
    Hunk(String),
    Context(String),
    Added(String),
    Removed(String),
}

/// Diff the pretty JSON of two values. An absent value renders as no lines.
pub fn diff_values(old: Option<&Document>, new: Option<&Document>) -> ValueDiff {
    let old_text = old.map(Document::to_pretty_json).unwrap_or_default();
    let new_text = new.map(Document::to_pretty_json).unwrap_or_default();
    if old_text == new_text {
        return ValueDiff::default();
    }

    let text_diff = TextDiff::from_lines(&old_text, &new_text);
    let mut unified = text_diff.unified_diff();
    unified.context_radius(CONTEXT_LINES);

    let mut lines = Vec::new();
    for hunk in unified.iter_hunks() {
        lines.push(DiffLine::Hunk(hunk.header().to_string()));
        for change in hunk.iter_changes() {
            let text = change.value().trim_end_matches('\n').to_string();
            lines.push(match change.tag() {
                ChangeTag::Equal => DiffLine::Context(text),
                ChangeTag::Delete => DiffLine::Removed(text),
                ChangeTag::Insert => DiffLine::Added(text),
            });
        }
    }
    ValueDiff { lines }
}
