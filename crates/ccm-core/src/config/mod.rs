//! Configuration resolution
//!
//! Connection settings and paths are merged from these sources (later sources
//! override earlier):
//!
//! 1. **Global defaults** - `<config_dir>/ccm/config.toml`
//! 2. **Project config** - `ccm.toml`
//! 3. **Local overrides** - `ccm.local.toml` (git-ignored)
//!
//! Command-line flags and `CONTENTFUL_*` environment variables are applied on
//! top by [`ConnectionSettings::resolve`].
//!
//! ```toml
//! [contentful]
//! space_id = "abc123"
//! environment = "master"
//!
//! [paths]
//! models = "models"
//! ```

mod connection;
mod manifest;
mod resolver;

pub use connection::{
    ACCESS_TOKEN_ENV, ConnectionOverrides, ConnectionSettings, DEFAULT_ENVIRONMENT,
    DEFAULT_MODELS_PATH, ENVIRONMENT_ENV, SPACE_ID_ENV, resolve_models_path, resolve_output_path,
};
pub use manifest::{ContentfulSection, Manifest, PathsSection};
pub use resolver::{ConfigResolver, LOCAL_CONFIG, PROJECT_CONFIG, ResolvedConfig};
