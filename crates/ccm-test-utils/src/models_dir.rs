//! [`TestModelsDir`] builder for models directory scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use ccm_meta::{ContentModel, Locale};
use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary models directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use ccm_test_utils::{fixtures, models_dir::TestModelsDir};
///
/// let dir = TestModelsDir::new();
/// dir.write_models(&[fixtures::blog()], &[fixtures::default_locale("en-US")]);
/// dir.assert_file_exists("blog.json");
/// ```
pub struct TestModelsDir {
    temp_dir: TempDir,
}

impl Default for TestModelsDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestModelsDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `<id>.json` for each model and an `index.json` listing them.
    pub fn write_models(&self, models: &[ContentModel], locales: &[Locale]) {
        let files: Vec<String> = models.iter().map(|m| self.write_model(m)).collect();
        self.write_index(&files, locales);
    }

    /// Write a single model file and return its name.
    pub fn write_model(&self, model: &ContentModel) -> String {
        let file = format!("{}.json", model.id);
        self.write_json(&file, &serde_json::to_value(model).unwrap());
        file
    }

    pub fn write_index(&self, files: &[String], locales: &[Locale]) {
        self.write_json("index.json", &json!({ "models": files, "locales": locales }));
    }

    pub fn write_json(&self, relative: &str, value: &Value) {
        self.write_file(relative, &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read_json(&self, relative: &str) -> Value {
        let path = self.path(relative);
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {}", path.display(), e))
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }
}
