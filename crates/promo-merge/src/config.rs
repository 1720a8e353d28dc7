use serde::{Deserialize, Serialize};

/// Configuration for the change applier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Pseudo-roots whose document is a top-level list of named entries.
    pub reserved_roots: Vec<String>,
    /// A path whose first or second segment equals this marks a named-list
    /// target.
    pub named_list_segment: String,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            reserved_roots: vec!["data".to_string(), "env".to_string()],
            named_list_segment: "env".to_string(),
        }
    }
}

impl ApplyConfig {
    pub fn is_reserved(&self, root: &str) -> bool {
        self.reserved_roots.iter().any(|r| r == root)
    }

    /// Whether a split key path falls under the named-list segment.
    pub fn is_named_list_path(&self, segments: &[&str]) -> bool {
        segments
            .iter()
            .take(2)
            .any(|segment| *segment == self.named_list_segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ApplyConfig::default();
        assert!(config.is_reserved("data"));
        assert!(config.is_reserved("env"));
        assert!(!config.is_reserved("svc"));
    }

    #[test]
    fn named_list_segment_in_first_two_positions() {
        let config = ApplyConfig::default();
        assert!(config.is_named_list_path(&["env"]));
        assert!(config.is_named_list_path(&["container", "env"]));
        assert!(!config.is_named_list_path(&["a", "b", "env"]));
        assert!(!config.is_named_list_path(&["resources", "limits"]));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ApplyConfig = serde_json::from_str(r#"{"named_list_segment": "vars"}"#).unwrap();
        assert_eq!(config.named_list_segment, "vars");
        assert_eq!(config.reserved_roots, vec!["data", "env"]);
    }
}
