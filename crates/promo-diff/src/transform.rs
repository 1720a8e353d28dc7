//! Rewrites applied to values bound for the higher environment.
//!
//! The diff engine reports each lower-environment value twice: verbatim, and
//! as the value the higher environment should receive. A [`ValueTransform`]
//! produces the second form. It is pure and stateless; the classification of
//! changes never depends on it.

use promo_types::{Document, EnvPair, Scalar};

/// A pure rewrite of a value destined for the higher environment.
///
/// `field` is the object key holding the value, or `None` for root documents
/// and list elements.
pub trait ValueTransform: Send + Sync {
    fn transform(&self, field: Option<&str>, value: &Document, envs: &EnvPair) -> Document;
}

impl<F> ValueTransform for F
where
    F: Fn(Option<&str>, &Document, &EnvPair) -> Document + Send + Sync,
{
    fn transform(&self, field: Option<&str>, value: &Document, envs: &EnvPair) -> Document {
        self(field, value, envs)
    }
}

/// Leaves every value unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransform;

impl ValueTransform for IdentityTransform {
    fn transform(&self, _field: Option<&str>, value: &Document, _envs: &EnvPair) -> Document {
        value.clone()
    }
}

/// Rewrites the environment segment of container image tags.
///
/// Every string held by an `image_name` key, at any depth, is treated as
/// `repository:tag`. When promoting out of a development environment the
/// higher environment name is appended to the tag; otherwise the tag segment
/// equal to the lower environment name is replaced by the higher one.
#[derive(Clone, Debug)]
pub struct ImageTagTransform {
    field: String,
    append_from: Vec<String>,
}

impl Default for ImageTagTransform {
    fn default() -> Self {
        Self {
            field: "image_name".to_string(),
            append_from: vec!["dev1".to_string(), "dev2".to_string()],
        }
    }
}

impl ImageTagTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower environments whose tags get the higher env appended.
    pub fn with_append_from(mut self, envs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.append_from = envs.into_iter().map(Into::into).collect();
        self
    }

    /// Rewrite a single `repository:tag` string.
    pub fn rewrite_tag(&self, image: &str, envs: &EnvPair) -> String {
        let Some((name, tag)) = image.split_once(':') else {
            return image.to_string();
        };
        let name = name.trim_matches('"');
        let mut parts: Vec<String> = tag.split('-').map(str::to_string).collect();
        if let Some(last) = parts.last_mut() {
            *last = last.trim_matches('"').to_string();
        }

        if self.append_from.iter().any(|e| *e == envs.lower) {
            if parts.last() != Some(&envs.higher) {
                parts.push(envs.higher.clone());
            }
        } else if let Some(idx) = parts.iter().position(|p| *p == envs.lower) {
            parts[idx] = envs.higher.clone();
        }

        format!("{name}:{}", parts.join("-"))
    }
}

impl ValueTransform for ImageTagTransform {
    fn transform(&self, field: Option<&str>, value: &Document, envs: &EnvPair) -> Document {
        match value {
            Document::Scalar(Scalar::String(s)) if field == Some(self.field.as_str()) => {
                Document::from(self.rewrite_tag(s, envs))
            }
            Document::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), self.transform(Some(k.as_str()), v, envs)))
                .collect(),
            Document::List(items) => Document::List(
                items.iter().map(|item| self.transform(None, item, envs)).collect(),
            ),
            Document::Scalar(_) => value.clone(),
        }
    }
}
