use std::fs;
use std::path::Path;

use anyhow::Context;
use promo_diff::{DiffConfig, DiffEngine, ImageTagTransform, PathStyle};
use promo_merge::{ApplyConfig, ChangeApplier};
use promo_types::EnvPair;
use serde::{Deserialize, Serialize};

/// How values bound for the higher environment are rewritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    #[default]
    Identity,
    ImageTag,
}

/// Settings for one promotion, read from a TOML file.
///
/// ```toml
/// lower_env = "dev1"
/// higher_env = "sit1"
/// transform = "image-tag"
///
/// [diff]
/// path_style = "exact"
///
/// [apply]
/// reserved_roots = ["data", "env"]
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoteConfig {
    pub lower_env: String,
    pub higher_env: String,
    pub transform: TransformKind,
    pub diff: DiffConfig,
    pub apply: ApplyConfig,
}

impl Default for PromoteConfig {
    fn default() -> Self {
        Self {
            lower_env: "dev1".to_string(),
            higher_env: "sit1".to_string(),
            transform: TransformKind::Identity,
            // Review files written here are fed back to `apply`.
            diff: DiffConfig::with_path_style(PathStyle::Exact),
            apply: ApplyConfig::default(),
        }
    }
}

impl PromoteConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn envs(&self) -> EnvPair {
        EnvPair::new(self.lower_env.as_str(), self.higher_env.as_str())
    }

    pub fn engine(&self) -> DiffEngine {
        let engine = DiffEngine::new(self.envs()).with_config(self.diff.clone());
        match self.transform {
            TransformKind::Identity => engine,
            TransformKind::ImageTag => engine.with_transform(ImageTagTransform::new()),
        }
    }

    pub fn applier(&self) -> ChangeApplier {
        ChangeApplier::with_config(self.apply.clone())
    }
}
