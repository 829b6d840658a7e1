//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<i32, CliError>`
//! - Thin wrappers that validate CLI input, call into `ProcessGuard` and the
//!   runtime adapters, and return the process exit code

pub mod run;

use clap::CommandFactory;
use tokio_util::sync::CancellationToken;

use crate::bootstrap::{CliConfig, bootstrap};
use crate::commands::Commands;
use crate::error::CliError;
use crate::parser::Cli;

/// Resolve configuration, bootstrap, and route the parsed command.
///
/// Without a subcommand, prints help and returns 0.
pub async fn dispatch(mut cli: Cli, cancel: &CancellationToken) -> anyhow::Result<i32> {
    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(0);
    };

    let config = CliConfig::from_cli(&cli).map_err(CliError::from)?;
    let ctx = bootstrap(config)?;

    let code = match command {
        Commands::Run(args) => run::execute(&ctx, args, cancel).await?,
    };
    Ok(code)
}
