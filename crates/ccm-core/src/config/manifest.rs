//! Manifest parsing for `ccm.toml` files
//!
//! A manifest is the parsed content of one configuration file. Manifests from
//! the global, project and local layers are merged into the effective
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;

/// `[contentful]` section: which space to talk to and how
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentfulSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    /// Target environment, `master` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Management token; belongs in `ccm.local.toml`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Management API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// `[paths]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSection {
    /// Models directory read by `migrate` and `trial`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<PathBuf>,

    /// Directory written by `sync`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Configuration parsed from a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub contentful: ContentfulSection,

    #[serde(default)]
    pub paths: PathsSection,
}

impl Manifest {
    /// Parse a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use ccm_core::config::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    /// [contentful]
    /// space_id = "abc123"
    ///
    /// [paths]
    /// models = "content/models"
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.contentful.space_id.as_deref(), Some("abc123"));
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge another manifest into this one.
    ///
    /// Every value set in `other` replaces the value in `self`; unset values
    /// leave `self` untouched.
    pub fn merge(&mut self, other: &Manifest) {
        let (ours, theirs) = (&mut self.contentful, &other.contentful);
        override_with(&mut ours.space_id, &theirs.space_id);
        override_with(&mut ours.environment, &theirs.environment);
        override_with(&mut ours.access_token, &theirs.access_token);
        override_with(&mut ours.api_url, &theirs.api_url);

        override_with(&mut self.paths.models, &other.paths.models);
        override_with(&mut self.paths.output, &other.paths.output);
    }
}

fn override_with<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        base.clone_from(other);
    }
}
