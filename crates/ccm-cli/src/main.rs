//! Content Model Migrations CLI
//!
//! Syncs, migrates and trial-migrates content models between a local models
//! directory and a space.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::CommandContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let ctx = CommandContext::load(&cwd, cli.connection)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(&ctx, cli.command))
}

/// `--verbose` logs debug with targets; otherwise `RUST_LOG`, or warnings only
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if initialized.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

async fn execute_command(ctx: &CommandContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync { output } => commands::run_sync(ctx, output).await,
        Commands::Migrate { models } => commands::run_migrate(ctx, models).await,
        Commands::Trial { models } => commands::run_trial(ctx, models).await,
    }
}
