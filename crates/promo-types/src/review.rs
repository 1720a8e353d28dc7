//! Flat review rows.
//!
//! Reviewers see change records as rows of strings: every value slot is
//! rendered as pretty JSON. Rows coming back from review are interpreted with
//! parse-or-raw semantics: text that parses as JSON becomes structured data,
//! anything else is kept verbatim as a string scalar. Parsing never fails.

use serde::{Deserialize, Serialize};

use crate::change::{ChangeKind, ChangeRecord};
use crate::document::Document;
use crate::env::EnvPair;
use crate::error::TypeResult;

/// Interpret a review cell. Empty or whitespace-only cells are absent.
pub fn parse_value(raw: &str) -> Option<Document> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => Some(Document::from(value)),
        Err(_) => Some(Document::from(raw)),
    }
}

fn render_value(value: Option<&Document>) -> String {
    value.map(Document::to_pretty_json).unwrap_or_default()
}

/// One reviewable change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub service_name: String,
    pub change_request: String,
    pub key: String,
    pub lower_current: String,
    pub lower_previous: String,
    pub higher_current: String,
    pub higher_previous: String,
    pub comment: String,
}

impl ReviewRow {
    pub fn from_record(record: &ChangeRecord) -> Self {
        Self {
            service_name: record.root.clone(),
            change_request: record.kind.as_str().to_string(),
            key: record.path.clone(),
            lower_current: render_value(record.cur_value_lower.as_ref()),
            lower_previous: render_value(record.prev_value_lower.as_ref()),
            higher_current: render_value(record.cur_value_higher.as_ref()),
            higher_previous: render_value(record.prev_value_higher.as_ref()),
            comment: record.comment.clone(),
        }
    }

    /// Interpret the row. Only an unknown change request is an error.
    pub fn to_record(&self) -> TypeResult<ChangeRecord> {
        let kind: ChangeKind = self.change_request.parse()?;
        Ok(ChangeRecord {
            root: self.service_name.trim().to_string(),
            kind,
            path: self.key.trim().to_string(),
            cur_value_lower: parse_value(&self.lower_current),
            prev_value_lower: parse_value(&self.lower_previous),
            cur_value_higher: parse_value(&self.higher_current),
            prev_value_higher: parse_value(&self.higher_previous),
            comment: self.comment.trim().to_string(),
        })
    }
}

/// A review file: the environment pair and the rows in review order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSheet {
    pub lower_env: String,
    pub higher_env: String,
    pub rows: Vec<ReviewRow>,
}

impl ReviewSheet {
    pub fn from_records<'a>(
        envs: &EnvPair,
        records: impl IntoIterator<Item = &'a ChangeRecord>,
    ) -> Self {
        Self {
            lower_env: envs.lower.clone(),
            higher_env: envs.higher.clone(),
            rows: records.into_iter().map(ReviewRow::from_record).collect(),
        }
    }

    pub fn envs(&self) -> EnvPair {
        EnvPair::new(self.lower_env.clone(), self.higher_env.clone())
    }

    /// Column headings, with the value columns named after the environments.
    pub fn headers(&self) -> [String; 8] {
        [
            "Service name".to_string(),
            "Change Request".to_string(),
            "Key".to_string(),
            format!("{}-current value", self.lower_env),
            format!("{}-previous value", self.lower_env),
            format!("{}-current value", self.higher_env),
            format!("{}-previous value", self.higher_env),
            "Comment".to_string(),
        ]
    }

    /// Interpret every row, stopping at the first unknown change request.
    pub fn to_records(&self) -> TypeResult<Vec<ChangeRecord>> {
        self.rows.iter().map(ReviewRow::to_record).collect()
    }
}
