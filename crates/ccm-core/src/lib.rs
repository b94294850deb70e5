//! Reconciliation engine for content model migrations
//!
//! This crate drives a remote space towards the definitions loaded by
//! `ccm-meta`, implementing:
//!
//! - **Reconcilers**: locale and content type runs with snapshot-based rollback
//! - **Migration**: locales first, then content types, reported as data
//! - **Trial runs**: migrate a disposable clone of an environment and clean up
//! - **Sync**: write the remote content model back to a local models directory
//! - **Configuration resolution**: global, project and local config files
//!
//! # Architecture
//!
//! ```text
//!                      ccm-cli
//!                         |
//!                     ccm-core
//!           +-------------+-------------+
//!           |                           |
//!       ccm-meta                   ccm-client
//!  (models, loader, store)   (management API, gateway)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ccm_client::ClientOptions;
//! use ccm_core::{ModelSource, migrate};
//!
//! let options = ClientOptions::new(token, space_id, "master");
//! let migration = migrate(&options, ModelSource::Path("models".into())).await?;
//! if !migration.is_success() {
//!     for error in migration.failures() {
//!         eprintln!("{}", error);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod migrate;
pub mod reconcile;
pub mod snapshot;
pub mod trial;

pub use config::{
    ConfigResolver, ConnectionOverrides, ConnectionSettings, Manifest, ResolvedConfig,
    resolve_models_path, resolve_output_path,
};
pub use error::{Error, Result};
pub use merge::{deep_merge_value, merge_editor_interface};
pub use migrate::{Definitions, MigrateRequest, Migration, Migrator, ModelSource, migrate, run_migration};
pub use reconcile::{
    ContentTypeReport, LocaleReport, Outcome, RollbackFailure, RollbackReport,
    reconcile_content_types, reconcile_locales,
};
pub use snapshot::{SyncSummary, sync_to_local};
pub use trial::{TrialPhase, TrialReport, TrialRunner};
