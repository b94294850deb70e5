//! Shared test utilities for the content model migrations workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fake`]: [`FakeSpace`], an in-memory management API
//! - [`fixtures`]: content model and locale fixtures
//! - [`models_dir`]: [`TestModelsDir`] builder for local models directories

pub mod fake;
pub mod fixtures;
pub mod models_dir;

pub use fake::{Call, FakeOp, FakeSpace, Readiness};
pub use models_dir::TestModelsDir;
