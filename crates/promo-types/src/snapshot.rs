use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::{TypeError, TypeResult};

/// All root documents of one environment at one point in time.
///
/// Keys are root object names (one per value file, e.g. a service name).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    roots: BTreeMap<String, Document>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a JSON object keyed by root name.
    pub fn from_value(value: Value) -> TypeResult<Self> {
        match Document::from(value) {
            Document::Object(roots) => Ok(Self { roots }),
            other => Err(TypeError::NotAnObject(other.kind_name())),
        }
    }

    pub fn get(&self, root: &str) -> Option<&Document> {
        self.roots.get(root)
    }

    pub fn get_mut(&mut self, root: &str) -> Option<&mut Document> {
        self.roots.get_mut(root)
    }

    pub fn contains(&self, root: &str) -> bool {
        self.roots.contains_key(root)
    }

    pub fn insert(&mut self, root: impl Into<String>, doc: Document) -> Option<Document> {
        self.roots.insert(root.into(), doc)
    }

    pub fn remove(&mut self, root: &str) -> Option<Document> {
        self.roots.remove(root)
    }

    /// The document for `root`, created with `default` if absent.
    pub fn entry_or_insert(&mut self, root: &str, default: Document) -> &mut Document {
        self.roots.entry(root.to_string()).or_insert(default)
    }

    /// Root names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.roots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Document> {
        self.roots
    }
}

impl From<BTreeMap<String, Document>> for Snapshot {
    fn from(roots: BTreeMap<String, Document>) -> Self {
        Self { roots }
    }
}

impl<S: Into<String>> FromIterator<(S, Document)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (S, Document)>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_requires_object() {
        let snap = Snapshot::from_value(json!({"svc": {"replicas": 2}})).unwrap();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains("svc"));

        let err = Snapshot::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err, TypeError::NotAnObject("list"));
    }

    #[test]
    fn names_are_sorted() {
        let snap: Snapshot = [
            ("web", Document::empty_object()),
            ("api", Document::empty_object()),
        ]
        .into_iter()
        .collect();
        assert_eq!(snap.names().collect::<Vec<_>>(), vec!["api", "web"]);
    }

    #[test]
    fn entry_or_insert_creates_once() {
        let mut snap = Snapshot::new();
        snap.entry_or_insert("env", Document::List(vec![]));
        snap.entry_or_insert("env", Document::empty_object());
        assert_eq!(snap.get("env"), Some(&Document::List(vec![])));
    }

    #[test]
    fn serializes_as_plain_map() {
        let snap = Snapshot::from_value(json!({"svc": {"a": 1}})).unwrap();
        assert_eq!(serde_json::to_value(&snap).unwrap(), json!({"svc": {"a": 1}}));
    }
}
