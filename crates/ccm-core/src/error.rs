//! Error types for ccm-core

/// Result type for ccm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ccm-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing credential or unusable model source
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Polling gave up before the remote reached the expected state
    #[error("{0}")]
    Timeout(String),

    /// Hard failure of a trial run, after cleanup was attempted
    #[error("Trial migration failed: {0}")]
    TrialMigration(String),

    /// Remote state contradicts what the reconciler just wrote
    #[error("Inconsistent remote state: {0}")]
    Inconsistent(String),

    /// Management API error from ccm-client
    #[error(transparent)]
    Client(#[from] ccm_client::Error),

    /// Model loading or validation error from ccm-meta
    #[error(transparent)]
    Meta(#[from] ccm_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
