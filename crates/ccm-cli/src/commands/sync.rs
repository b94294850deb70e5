//! Sync command: remote content model to local files

use std::path::PathBuf;

use colored::Colorize;

use ccm_core::sync_to_local;

use crate::context::CommandContext;
use crate::error::Result;

/// Run the sync command
pub async fn run_sync(ctx: &CommandContext, output: Option<PathBuf>) -> Result<()> {
    let settings = ctx.settings()?;
    let output = ctx.output_path(output);
    println!(
        "{} Syncing content types from {} to {}...",
        "=>".blue().bold(),
        settings.environment().cyan(),
        output.display()
    );

    let client = settings.gateway().create_client(&settings.options)?;
    let summary = sync_to_local(&client, &output).await?;

    for path in &summary.models {
        println!("   {} {}", "+".green(), path.display());
    }
    println!("   {} {}", "+".green(), summary.index.display());
    println!(
        "{} Synced {} content type(s) and {} locale(s).",
        "OK".green().bold(),
        summary.models.len(),
        summary.locales
    );

    Ok(())
}
