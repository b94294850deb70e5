//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ccm_core::ConnectionOverrides;
use ccm_core::config::{ACCESS_TOKEN_ENV, ENVIRONMENT_ENV, SPACE_ID_ENV};

/// Content Model Migrations - Keep a space's content model in sync with local definitions
#[derive(Parser, Debug)]
#[command(name = "ccm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags shared by every command
///
/// Unset flags fall back to the environment, then to `ccm.local.toml`,
/// `ccm.toml` and the global config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Space id
    #[arg(short = 's', long, global = true, env = SPACE_ID_ENV)]
    pub space_id: Option<String>,

    /// Management API access token
    #[arg(short = 't', long, global = true, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Environment id [default: master]
    #[arg(short = 'e', long, global = true, env = ENVIRONMENT_ENV)]
    pub environment: Option<String>,

    /// Management API base URL
    #[arg(long, global = true, env = "CCM_API_URL", hide = true)]
    pub api_url: Option<String>,

    /// Directory holding the global config.toml
    #[arg(long, global = true, env = "CCM_CONFIG_DIR", hide = true)]
    pub config_dir: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            space_id: self.space_id.clone(),
            access_token: self.access_token.clone(),
            environment: self.environment.clone(),
            api_url: self.api_url.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write the remote content model to local model files
    ///
    /// Examples:
    ///   ccm sync                      # Into the configured models directory
    ///   ccm sync -o content/models    # Into a specific directory
    Sync {
        /// Output directory [default: models]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Migrate local model files into the environment
    ///
    /// Locales are reconciled first, then content types. Changes of a
    /// failed step are rolled back.
    Migrate {
        /// Models directory holding an index file [default: models]
        #[arg(short, long)]
        models: Option<PathBuf>,
    },

    /// Try a migration on a temporary copy of the environment
    ///
    /// The copy is deleted afterwards; the environment itself is not touched.
    Trial {
        /// Models directory holding an index file [default: models]
        #[arg(short, long)]
        models: Option<PathBuf>,
    },
}
