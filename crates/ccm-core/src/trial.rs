//! Trial migrations against a disposable environment
//!
//! A trial clones the target environment, migrates the clone, counts the
//! resulting content types and deletes the clone again:
//!
//! ```text
//! Creating -> WaitingReady -> Migrating -> Verifying -> CleaningUp -> Done
//!     \____________\______________\________________________/
//!                           on hard failure: CleaningUp -> Failed
//! ```

use std::fmt;
use std::time::Duration;

use ccm_client::{Client, ClientOptions, Gateway};

use crate::migrate::{Definitions, ModelSource, run_migration};
use crate::reconcile::FETCH_LIMIT;
use crate::{Error, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Stage of a trial run, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    Creating,
    WaitingReady,
    Migrating,
    Verifying,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Creating => "creating",
            Self::WaitingReady => "waiting-ready",
            Self::Migrating => "migrating",
            Self::Verifying => "verifying",
            Self::CleaningUp => "cleaning-up",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a completed trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialReport {
    pub base_environment: String,
    pub trial_environment: String,
    pub local_models: usize,
    /// Content types present in the trial environment after migrating
    pub created: usize,
    /// Always 0: created and updated types are not told apart
    pub updated: usize,
    pub errors: Vec<String>,
}

impl TrialReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trial Migration Report")?;
        writeln!(f, "======================")?;
        writeln!(f, "Base Environment: {}", self.base_environment)?;
        writeln!(f, "Trial Environment: {}", self.trial_environment)?;
        writeln!(f, "Local Models: {} files processed", self.local_models)?;
        writeln!(f)?;
        writeln!(f, "Results:")?;
        writeln!(f, "  Created: {}", self.created)?;
        writeln!(f, "  Updated: {}", self.updated)?;
        writeln!(f, "  Errors: {}", self.errors.len())?;
        writeln!(f)?;

        if self.errors.is_empty() {
            writeln!(f, "Migration completed successfully!")?;
        } else {
            writeln!(f, "Errors:")?;
            for error in &self.errors {
                writeln!(f, "  - {}", error)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Next Steps:")?;
        if self.errors.is_empty() {
            write!(
                f,
                "  Run 'ccm migrate --environment {}' to apply these changes to your main environment.",
                self.base_environment
            )
        } else {
            write!(
                f,
                "  Fix the errors above and run the trial again before applying to your main environment."
            )
        }
    }
}

/// Runs trial migrations through a [`Gateway`]
#[derive(Debug, Clone)]
pub struct TrialRunner {
    gateway: Gateway,
    poll_interval: Duration,
    max_attempts: u32,
}

impl Default for TrialRunner {
    fn default() -> Self {
        Self::new(Gateway::default())
    }
}

impl TrialRunner {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Run a trial of `source` against a clone of the environment of
    /// `options`.
    ///
    /// Reconciler and verification failures are listed in the report. Any
    /// failure to create, ready or migrate the clone is returned as
    /// [`Error::TrialMigration`]. The clone is deleted in both cases.
    pub async fn run(&self, options: &ClientOptions, source: ModelSource) -> Result<TrialReport> {
        let definitions = source.load().map_err(trial_failure)?;
        let base = self.gateway.create_client(options).map_err(trial_failure)?;

        let trial_id = format!("trial-{}", chrono::Utc::now().timestamp_millis());
        tracing::info!(
            base = %options.environment_id,
            trial = %trial_id,
            "Starting trial migration"
        );

        let mut report = TrialReport {
            base_environment: options.environment_id.clone(),
            trial_environment: trial_id.clone(),
            local_models: definitions.models.len(),
            created: 0,
            updated: 0,
            errors: Vec::new(),
        };

        let trial_options = options.with_environment(&trial_id);
        let result = self
            .execute(&base, &trial_options, &definitions, &mut report)
            .await;

        enter(TrialPhase::CleaningUp, &trial_id);
        match base.delete_environment(&trial_id).await {
            Ok(()) => tracing::info!(trial = %trial_id, "Trial environment cleaned up"),
            Err(error) => tracing::warn!(
                trial = %trial_id,
                %error,
                "Could not clean up trial environment, please delete it manually"
            ),
        }

        match result {
            Ok(()) => {
                enter(TrialPhase::Done, &trial_id);
                Ok(report)
            }
            Err(error) => {
                enter(TrialPhase::Failed, &trial_id);
                Err(error)
            }
        }
    }

    async fn execute(
        &self,
        base: &Client,
        trial_options: &ClientOptions,
        definitions: &Definitions,
        report: &mut TrialReport,
    ) -> Result<()> {
        let trial_id = trial_options.environment_id.as_str();

        enter(TrialPhase::Creating, trial_id);
        self.create_environment(base, trial_id).await.map_err(|e| {
            Error::TrialMigration(format!("Failed to create trial environment: {}", e))
        })?;

        enter(TrialPhase::Migrating, trial_id);
        let migration = run_migration(base.for_environment(trial_id), definitions).await;
        for error in migration.failures() {
            report.errors.push(error.to_string());
        }

        enter(TrialPhase::Verifying, trial_id);
        let verified = match self.gateway.create_client(trial_options) {
            Ok(trial) => trial.content_types(FETCH_LIMIT).await,
            Err(error) => Err(error),
        };
        match verified {
            Ok(content_types) => {
                tracing::info!(
                    count = content_types.len(),
                    "Migration completed with content types"
                );
                report.created = content_types.len();
            }
            Err(error) => report.errors.push(format!("Verification failed: {}", error)),
        }

        Ok(())
    }

    async fn create_environment(&self, base: &Client, trial_id: &str) -> Result<()> {
        let created = base.create_environment(trial_id).await?;
        tracing::info!(trial = %created.id(), "Trial environment created");

        enter(TrialPhase::WaitingReady, trial_id);
        self.wait_until_ready(base, trial_id).await
    }

    async fn wait_until_ready(&self, base: &Client, trial_id: &str) -> Result<()> {
        for attempt in 1..=self.max_attempts {
            let environment = base.environment(trial_id).await?;
            if environment.is_ready() {
                tracing::info!(trial = %trial_id, attempt, "Environment is ready");
                return Ok(());
            }

            tracing::debug!(
                trial = %trial_id,
                attempt,
                status = environment.status().unwrap_or("unknown"),
                "Environment not ready yet"
            );
            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(Error::Timeout(
            "Environment did not become ready within timeout period".to_string(),
        ))
    }
}

/// Failure before the trial environment exists
fn trial_failure(error: impl Into<Error>) -> Error {
    Error::TrialMigration(error.into().to_string())
}

fn enter(phase: TrialPhase, trial_id: &str) {
    tracing::info!(%phase, trial = %trial_id, "Trial phase");
}
