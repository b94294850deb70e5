//! Outcome of a reconciliation run

use std::fmt;

use crate::Error;

/// How a reconciliation run ended
#[derive(Debug)]
pub enum Outcome {
    /// All changes were applied
    Applied,
    /// Nothing was desired, nothing was touched
    Skipped,
    /// A step failed; the changes made so far were rolled back
    Failed {
        error: Error,
        rollback: RollbackReport,
    },
}

impl Outcome {
    pub fn failed(error: impl Into<Error>, rollback: RollbackReport) -> Self {
        Self::Failed {
            error: error.into(),
            rollback,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn rollback(&self) -> Option<&RollbackReport> {
        match self {
            Self::Failed { rollback, .. } => Some(rollback),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed { error, rollback } => {
                write!(f, "failed: {} ({})", error, rollback)
            }
        }
    }
}

/// A rollback step that could not be completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackFailure {
    /// What was being undone, e.g. `delete content type 'blog'`
    pub action: String,
    pub error: String,
}

/// What a rollback managed to undo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    /// Pre-existing resources restored to their pre-run state
    pub restored: Vec<String>,
    /// Resources created by the run and deleted again
    pub deleted: Vec<String>,
    pub failures: Vec<RollbackFailure>,
}

impl RollbackReport {
    /// Whether every rollback step succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record a failed rollback step; logged, never raised.
    pub(crate) fn record_failure(&mut self, action: impl Into<String>, error: &dyn fmt::Display) {
        let action = action.into();
        tracing::warn!(%action, %error, "Rollback step failed");
        self.failures.push(RollbackFailure {
            action,
            error: error.to_string(),
        });
    }
}

impl fmt::Display for RollbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rolled back: {} restored, {} deleted, {} failed",
            self.restored.len(),
            self.deleted.len(),
            self.failures.len()
        )
    }
}
