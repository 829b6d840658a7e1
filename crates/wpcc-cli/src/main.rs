//! CLI entry point.
//!
//! Parses arguments, installs logging and the Ctrl-C hook, and dispatches.
//! Codeception's exit code becomes the process exit code; wpcc's own
//! failures print one `error:` line and exit with a sysexits-style code.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use wpcc_cli::{Cli, CliError, cancel_on_ctrl_c, exit_status, handlers, init_logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match handlers::dispatch(cli, &cancel).await {
        Ok(code) => exit_status(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            exit_status(code)
        }
    }
}
