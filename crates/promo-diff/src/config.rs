use std::fmt;
use std::str::FromStr;

use promo_types::path;
use serde::{Deserialize, Serialize};

/// How change record paths are reported.
///
/// Reviewers group changes by the container that changed, so by default a
/// record names the parent of the changed node. `Exact` names the changed
/// node itself, which lets an unfiltered change set be replayed by the
/// applier. Named-list and positional-list changes always name the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathStyle {
    /// Parent container; a top-level key reports the root path `""`.
    #[default]
    Grouped,
    /// Parent container; a top-level key reports its own name.
    LegacyGrouped,
    /// Full path of the changed node.
    Exact,
}

impl PathStyle {
    /// The path to report for a change to the node at `node_path`.
    pub fn locate(&self, node_path: &str) -> String {
        match self {
            Self::Grouped => path::parent_or_root(node_path).to_string(),
            Self::LegacyGrouped => path::parent(node_path).to_string(),
            Self::Exact => node_path.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grouped => "grouped",
            Self::LegacyGrouped => "legacy-grouped",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(Self::Grouped),
            "legacy-grouped" | "legacy" => Ok(Self::LegacyGrouped),
            "exact" => Ok(Self::Exact),
            other => Err(format!("unknown path style: {other}")),
        }
    }
}

/// Configuration for the diff engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    pub path_style: PathStyle,
}

impl DiffConfig {
    pub fn with_path_style(path_style: PathStyle) -> Self {
        Self { path_style }
    }
}
