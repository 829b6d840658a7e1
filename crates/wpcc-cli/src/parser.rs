//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the Codeception runner.
///
/// Global options configure the guarded Selenium server and where the
/// project lives; subcommands pick the operation.
#[derive(Debug, Parser)]
#[command(name = "wpcc")]
#[command(about = "Run Codeception tests with a Selenium server started on demand")]
#[command(version)]
pub struct Cli {
    /// WordPress plugin/project root containing node_modules and vendor
    #[arg(long, env = "WPCC_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Selenium launcher (also the process match pattern)
    #[arg(long = "selenium-path", env = "WPCC_SELENIUM_PATH", global = true)]
    pub selenium_path: Option<PathBuf>,

    /// Codeception launcher
    #[arg(long = "codecept-path", env = "WPCC_CODECEPT_PATH", global = true)]
    pub codecept_path: Option<PathBuf>,

    /// Wait after starting Selenium before running tests
    #[arg(
        long = "startup-grace-ms",
        env = "WPCC_STARTUP_GRACE_MS",
        default_value_t = 2000,
        global = true
    )]
    pub startup_grace_ms: u64,

    /// Poll this URL for readiness instead of waiting a fixed delay
    #[arg(long = "ready-url", env = "WPCC_READY_URL", global = true)]
    pub ready_url: Option<String>,

    /// Give up on --ready-url after this many seconds
    #[arg(
        long = "ready-timeout-secs",
        env = "WPCC_READY_TIMEOUT_SECS",
        default_value_t = 30,
        global = true
    )]
    pub ready_timeout_secs: u64,

    /// Only stop Selenium if this run started it
    #[arg(long = "only-stop-owned", global = true)]
    pub only_stop_owned: bool,

    /// Do not serialize runs against the same Selenium launcher
    #[arg(long = "no-lock", global = true)]
    pub no_lock: bool,

    /// How long to wait for another run holding the lock
    #[arg(
        long = "lock-wait-secs",
        env = "WPCC_LOCK_WAIT_SECS",
        default_value_t = 600,
        global = true
    )]
    pub lock_wait_secs: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "wpcc",
            "--root",
            "/srv/wp",
            "--verbose",
            "run",
            "--no-lock",
            "--startup-grace-ms",
            "500",
        ]);
        assert!(cli.verbose);
        assert!(cli.no_lock);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/wp")));
        assert_eq!(cli.startup_grace_ms, 500);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["wpcc"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.ready_timeout_secs, 30);
        assert_eq!(cli.lock_wait_secs, 600);
        assert!(!cli.only_stop_owned);
    }
}
