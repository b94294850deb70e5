//! Reconcilers: diff desired definitions against the remote space and apply
//! the difference
//!
//! Each reconciler owns its rollback baseline for the duration of one run and
//! reports how the run ended as an [`Outcome`] instead of an error.

pub mod content_types;
pub mod locales;
pub mod outcome;

pub use content_types::{ContentTypeReport, FETCH_LIMIT, merged_body, reconcile_content_types};
pub use locales::{LocaleReport, reconcile_locales};
pub use outcome::{Outcome, RollbackFailure, RollbackReport};
