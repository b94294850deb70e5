//! Migrate command: local model files to the remote environment

use std::path::PathBuf;

use colored::Colorize;

use ccm_core::{Migration, Migrator, ModelSource, Outcome, RollbackReport};

use crate::context::CommandContext;
use crate::error::{CliError, Result};

/// Run the migrate command
///
/// Fails when either reconciler failed, after printing what was rolled back.
pub async fn run_migrate(ctx: &CommandContext, models: Option<PathBuf>) -> Result<()> {
    let settings = ctx.settings()?;
    let models = ctx.models_path(models);
    println!(
        "{} Migrating {} into {}...",
        "=>".blue().bold(),
        models.display(),
        settings.environment().cyan()
    );

    let migration = Migrator::new(settings.gateway())
        .migrate(&settings.options, ModelSource::Path(models))
        .await?;
    print_migration(&migration);

    if migration.is_success() {
        println!("{} Migration complete.", "OK".green().bold());
        Ok(())
    } else {
        Err(CliError::user("Migration failed, changes were rolled back"))
    }
}

fn print_migration(migration: &Migration) {
    let locales = &migration.locales;
    print_step("Locales", &locales.outcome);
    print_items("+", "created", &locales.created);
    print_items("~", "updated", &locales.updated);
    print_items("-", "deactivated", &locales.deactivated);

    let content_types = &migration.content_types;
    print_step("Content types", &content_types.outcome);
    print_items("+", "created", &content_types.created);
    print_items("~", "published", &content_types.published);
    print_items("~", "editor interface", &content_types.editor_interfaces_updated);
    for id in &content_types.editor_interfaces_missing {
        println!("   {} no editor interface for {}", "!".yellow(), id.cyan());
    }
}

fn print_step(name: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Applied => println!("{} {}", "OK".green().bold(), name),
        Outcome::Skipped => println!("{} {} (nothing to migrate)", "SKIP".yellow().bold(), name),
        Outcome::Failed { error, rollback } => {
            println!("{} {}: {}", "FAILED".red().bold(), name, error);
            print_rollback(rollback);
        }
    }
}

fn print_items(marker: &str, action: &str, ids: &[String]) {
    for id in ids {
        println!("   {} {} {}", marker.green(), action.dimmed(), id);
    }
}

fn print_rollback(rollback: &RollbackReport) {
    for id in &rollback.restored {
        println!("   {} restored {}", "<".yellow(), id);
    }
    for id in &rollback.deleted {
        println!("   {} deleted {}", "<".yellow(), id);
    }
    for failure in &rollback.failures {
        println!(
            "   {} could not {}: {}",
            "!".red(),
            failure.action,
            failure.error
        );
    }
}
