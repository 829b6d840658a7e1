//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use clap::{Args, Subcommand};

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run Codeception, starting Selenium first if it is not running
    Run(RunCommand),
}

/// Arguments of `wpcc run`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunCommand {
    /// Suite to run (all suites when omitted)
    pub suite: Option<String>,

    /// Single test within the suite
    pub test: Option<String>,

    /// Show test steps in output
    #[arg(long)]
    pub steps: bool,

    /// Show debug and scenario output
    #[arg(long)]
    pub debug: bool,

    /// Leave Selenium running after the tests finish
    #[arg(long = "keep-alive")]
    pub keep_alive: bool,
}

#[cfg(test)]
mod tests {
    use crate::Cli;
    use crate::commands::Commands;
    use clap::Parser;

    fn run_command(argv: &[&str]) -> super::RunCommand {
        match Cli::parse_from(argv).command {
            Some(Commands::Run(run)) => run,
            None => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn run_accepts_positionals_and_flags() {
        let run = run_command(&[
            "wpcc",
            "run",
            "acceptance",
            "LoginCest",
            "--steps",
            "--debug",
            "--keep-alive",
        ]);
        assert_eq!(run.suite.as_deref(), Some("acceptance"));
        assert_eq!(run.test.as_deref(), Some("LoginCest"));
        assert!(run.steps);
        assert!(run.debug);
        assert!(run.keep_alive);
    }

    #[test]
    fn bare_run_has_no_suite() {
        let run = run_command(&["wpcc", "run"]);
        assert!(run.suite.is_none());
        assert!(run.test.is_none());
        assert!(!run.keep_alive);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = Cli::try_parse_from(["wpcc", "run", "--group", "slow"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
