//! Command context
//!
//! Resolves the layered configuration of the working directory once and
//! combines it with the connection flags of the invocation.

use std::path::{Path, PathBuf};

use ccm_core::{
    ConfigResolver, ConnectionSettings, ResolvedConfig, resolve_models_path, resolve_output_path,
};

use crate::cli::ConnectionArgs;
use crate::error::Result;

#[derive(Debug)]
pub struct CommandContext {
    root: PathBuf,
    config: ResolvedConfig,
    connection: ConnectionArgs,
}

impl CommandContext {
    /// Resolve configuration for the project rooted at `root`
    pub fn load(root: &Path, connection: ConnectionArgs) -> Result<Self> {
        let resolver = match &connection.config_dir {
            Some(dir) => ConfigResolver::with_global_config_dir(root, dir.clone()),
            None => ConfigResolver::new(root),
        };
        if resolver.has_local_overrides() {
            tracing::debug!(root = %root.display(), "Using local config overrides");
        }
        let config = resolver.resolve()?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
            connection,
        })
    }

    /// Connection settings; fails when space id or token is missing
    pub fn settings(&self) -> Result<ConnectionSettings> {
        Ok(ConnectionSettings::resolve(
            &self.connection.overrides(),
            &self.config,
        )?)
    }

    pub fn models_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        self.root.join(resolve_models_path(explicit, &self.config))
    }

    pub fn output_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        self.root.join(resolve_output_path(explicit, &self.config))
    }
}
