//! Loader for a local models directory
//!
//! A models directory is described by an index file listing the models to
//! migrate and, optionally, the locales of the space:
//!
//! ```text
//! models/
//!   index.json        { "models": ["blog.json", "author.yaml"], "locales": [...] }
//!   blog.json
//!   author.yaml
//! ```
//!
//! Entries of `models` are either paths relative to the directory or inline
//! model objects. The index may be JSON, YAML or TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::schema::{ContentModel, Locale};
use crate::store::{DefinitionFormat, DefinitionStore};
use crate::validation::validate_models;
use crate::{Error, Result};

/// Index file names, in lookup order
pub const INDEX_FILES: [&str; 4] = ["index.json", "index.yaml", "index.yml", "index.toml"];

/// Directories never scanned for model files
const IGNORED_DIRS: [&str; 2] = ["__tests__", "node_modules"];

/// A model definition file found in the models directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFileInfo {
    /// Path relative to the models directory, forward slashes
    pub file: String,
    /// Absolute path
    pub path: PathBuf,
}

/// Result of loading a models directory
#[derive(Debug, Clone)]
pub struct LoadedModels {
    pub models: Vec<ContentModel>,
    pub locales: Vec<Locale>,
    pub file_info: Vec<ModelFileInfo>,
    /// Number of loaded models
    pub count: usize,
    /// Index file the models were loaded from
    pub index: PathBuf,
}

/// Loads model definitions from a directory with an index file
#[derive(Debug, Default)]
pub struct ModelLoader {
    store: DefinitionStore,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate all models listed by the directory's index file.
    ///
    /// Relative paths are resolved against the current working directory.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexNotFound`] if the directory has no index file
    /// - [`Error::InvalidModels`] if `models` is missing or not an array
    /// - [`Error::InvalidModel`] if a model fails validation
    pub fn load(&self, models_path: impl AsRef<Path>) -> Result<LoadedModels> {
        let dir = resolve_path(models_path.as_ref())?;
        tracing::info!(path = %dir.display(), "Loading models");

        let index = find_index(&dir).ok_or_else(|| Error::IndexNotFound { path: dir.clone() })?;
        tracing::debug!(index = %index.display(), "Using index file");

        let document: Value = self.store.load(&index)?;

        let entries = document
            .get("models")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::InvalidModels {
                path: index.clone(),
                message: "models must be an array of content models. \
                          Expected format: { \"models\": [\"blog.json\", ...] }"
                    .to_string(),
            })?;

        let mut models = Vec::with_capacity(entries.len());
        for entry in entries {
            models.push(self.load_entry(&dir, &index, entry)?);
        }

        let locales = match document.get("locales") {
            None | Some(Value::Null) => Vec::new(),
            Some(value @ Value::Array(_)) => {
                serde_json::from_value(value.clone()).map_err(|e| Error::InvalidModels {
                    path: index.clone(),
                    message: format!("invalid locales: {}", e),
                })?
            }
            Some(_) => {
                return Err(Error::InvalidModels {
                    path: index.clone(),
                    message: "locales must be an array".to_string(),
                });
            }
        };

        validate_models(&models, &locales)?;

        let file_info = collect_model_files(&dir)?;
        tracing::info!(count = models.len(), "Found model(s) to migrate");

        Ok(LoadedModels {
            count: models.len(),
            models,
            locales,
            file_info,
            index,
        })
    }

    fn load_entry(&self, dir: &Path, index: &Path, entry: &Value) -> Result<ContentModel> {
        match entry {
            Value::String(file) => self.store.load(&dir.join(file)),
            Value::Object(_) => {
                serde_json::from_value(entry.clone()).map_err(|e| Error::InvalidModels {
                    path: index.to_path_buf(),
                    message: format!("invalid inline model: {}", e),
                })
            }
            other => Err(Error::InvalidModels {
                path: index.to_path_buf(),
                message: format!("expected a model object or file path, got {}", other),
            }),
        }
    }
}

/// Load a models directory with the default loader
pub fn load_models(models_path: impl AsRef<Path>) -> Result<LoadedModels> {
    ModelLoader::new().load(models_path)
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| Error::io(path, e))?;
    Ok(cwd.join(path))
}

fn find_index(dir: &Path) -> Option<PathBuf> {
    INDEX_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Collect model definition files below `dir`, excluding index files.
fn collect_model_files(dir: &Path) -> Result<Vec<ModelFileInfo>> {
    let mut files = Vec::new();
    walk(dir, dir, &mut files)?;
    files.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(files)
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<ModelFileInfo>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if path.is_dir() {
            if !IGNORED_DIRS.contains(&name.as_str()) {
                walk(root, &path, files)?;
            }
            continue;
        }

        let is_index = dir == root && INDEX_FILES.contains(&name.as_str());
        if is_index || !DefinitionFormat::is_definition_file(&path) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        files.push(ModelFileInfo {
            file: relative,
            path,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_index_prefers_json() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.toml"), "models = []").unwrap();
        fs::write(temp.path().join("index.json"), "{\"models\": []}").unwrap();

        let index = find_index(temp.path()).unwrap();
        assert!(index.ends_with("index.json"));
    }

    #[test]
    fn test_collect_skips_index_and_test_dirs() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.json"), "{}").unwrap();
        fs::write(temp.path().join("blog.json"), "{}").unwrap();
        fs::write(temp.path().join("notes.md"), "").unwrap();
        fs::create_dir_all(temp.path().join("__tests__")).unwrap();
        fs::write(temp.path().join("__tests__/fixture.json"), "{}").unwrap();
        fs::create_dir_all(temp.path().join("shared")).unwrap();
        fs::write(temp.path().join("shared/rich_text.yaml"), "").unwrap();

        let files = collect_model_files(temp.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(names, vec!["blog.json", "shared/rich_text.yaml"]);
    }

    #[test]
    fn test_relative_path_resolves_from_cwd() {
        let resolved = resolve_path(Path::new("models")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("models"));
    }
}
