//! Command implementations for ccm-cli

pub mod migrate;
pub mod sync;
pub mod trial;

pub use migrate::run_migrate;
pub use sync::run_sync;
pub use trial::run_trial;
