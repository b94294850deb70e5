//! Content model definitions for content model migrations.
//!
//! This crate owns the desired-state side of a migration:
//!
//! - **Schema**: [`ContentModel`], [`Field`], [`EditorInterfaceConfig`] and
//!   [`Locale`], serialized in the management API's wire format
//! - **Validation**: structural checks run on every loaded model set
//! - **Loader**: discovery of a models directory through its index file
//! - **Store**: format-agnostic (JSON/YAML/TOML) reads and atomic writes
//!
//! # Example
//!
//! ```ignore
//! use ccm_meta::ModelLoader;
//!
//! let loaded = ModelLoader::new().load("models")?;
//! println!("{} model(s) to migrate", loaded.count);
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use loader::{LoadedModels, ModelFileInfo, ModelLoader, load_models};
pub use schema::{
    ContentModel, Control, EditorInterfaceConfig, Field, FieldType, Items, LinkType, Locale,
};
pub use store::{DefinitionFormat, DefinitionStore};
pub use validation::validate_models;
