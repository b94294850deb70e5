//! Trial command: migrate a temporary copy of the environment

use std::path::PathBuf;

use colored::Colorize;

use ccm_core::{ModelSource, TrialRunner};

use crate::context::CommandContext;
use crate::error::{CliError, Result};

/// Run the trial command
pub async fn run_trial(ctx: &CommandContext, models: Option<PathBuf>) -> Result<()> {
    let settings = ctx.settings()?;
    let models = ctx.models_path(models);
    println!(
        "{} Running trial migration of {} against a copy of {}...",
        "=>".blue().bold(),
        models.display(),
        settings.environment().cyan()
    );

    let report = TrialRunner::new(settings.gateway())
        .run(&settings.options, ModelSource::Path(models))
        .await?;

    println!();
    println!("{}", report);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "Trial migration finished with {} error(s)",
            report.errors.len()
        )))
    }
}
