//! Configuration resolution with hierarchical merge
//!
//! The `ConfigResolver` loads and merges configuration from multiple sources
//! in a defined hierarchy, with later sources overriding earlier ones.

use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::Manifest;
use crate::Result;

/// Project configuration file name
pub const PROJECT_CONFIG: &str = "ccm.toml";

/// Git-ignored local overrides, typically holding the access token
pub const LOCAL_CONFIG: &str = "ccm.local.toml";

/// The effective configuration after merging all layers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub space_id: Option<String>,
    pub environment: Option<String>,
    pub access_token: Option<String>,
    pub api_url: Option<String>,
    pub models_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

impl From<Manifest> for ResolvedConfig {
    fn from(manifest: Manifest) -> Self {
        Self {
            space_id: manifest.contentful.space_id,
            environment: manifest.contentful.environment,
            access_token: manifest.contentful.access_token,
            api_url: manifest.contentful.api_url,
            models_path: manifest.paths.models,
            output_path: manifest.paths.output,
        }
    }
}

/// Resolves configuration by merging multiple sources
///
/// Configuration is loaded from a hierarchy of sources:
/// 1. Global defaults (`<config_dir>/ccm/config.toml`)
/// 2. Project config (`ccm.toml`)
/// 3. Local overrides (`ccm.local.toml`), git-ignored
///
/// Later sources override earlier ones.
pub struct ConfigResolver {
    /// Project directory holding `ccm.toml`
    root: PathBuf,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver for the given project directory
    ///
    /// Uses the platform-appropriate global config directory:
    /// - Linux: `~/.config/ccm/`
    /// - macOS: `~/Library/Application Support/ccm/`
    /// - Windows: `%APPDATA%\ccm\`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(root: impl Into<PathBuf>, global_config_dir: PathBuf) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: Some(global_config_dir),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("ccm"))
    }

    /// Resolve the configuration by merging all layers.
    ///
    /// Missing layers are skipped. Invalid TOML in any layer is an error.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let mut manifest = Manifest::empty();

        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            merge_layer(&mut manifest, &global_config_path, "global")?;
        }
        merge_layer(&mut manifest, &self.root.join(PROJECT_CONFIG), "project")?;
        merge_layer(&mut manifest, &self.root.join(LOCAL_CONFIG), "local")?;

        Ok(ResolvedConfig::from(manifest))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn has_config(&self) -> bool {
        self.root.join(PROJECT_CONFIG).is_file()
    }

    pub fn has_local_overrides(&self) -> bool {
        self.root.join(LOCAL_CONFIG).is_file()
    }
}

fn merge_layer(manifest: &mut Manifest, path: &Path, layer: &str) -> Result<()> {
    if !path.is_file() {
        tracing::debug!(?path, layer, "No config found, skipping");
        return Ok(());
    }

    tracing::debug!(?path, layer, "Loading config");
    let content = fs::read_to_string(path)?;
    manifest.merge(&Manifest::parse(&content)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver_for(temp_dir: &TempDir) -> ConfigResolver {
        ConfigResolver::with_global_config_dir(temp_dir.path(), temp_dir.path().join("global"))
    }

    #[test]
    fn resolve_returns_defaults_when_no_config_exists() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver_for(&temp_dir);

        assert!(!resolver.has_config());
        assert!(!resolver.has_local_overrides());
        assert_eq!(resolver.resolve().unwrap(), ResolvedConfig::default());
    }

    #[test]
    fn resolve_applies_layers_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let global_dir = temp_dir.path().join("global");
        fs::create_dir_all(&global_dir).unwrap();

        fs::write(
            global_dir.join("config.toml"),
            "[contentful]\nspace_id = \"global-space\"\napi_url = \"https://api.example.com\"\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG),
            "[contentful]\nspace_id = \"project-space\"\n\n[paths]\nmodels = \"content\"\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join(LOCAL_CONFIG),
            "[contentful]\naccess_token = \"CFPAT-local\"\n",
        )
        .unwrap();

        let config = resolver_for(&temp_dir).resolve().unwrap();

        assert_eq!(config.space_id.as_deref(), Some("project-space"));
        assert_eq!(config.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.access_token.as_deref(), Some("CFPAT-local"));
        assert_eq!(config.models_path, Some(PathBuf::from("content")));
        assert_eq!(config.environment, None);
    }

    #[test]
    fn resolve_reports_invalid_layer() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG), "[contentful").unwrap();

        assert!(resolver_for(&temp_dir).resolve().is_err());
    }
}
