//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Process inspector (via wpcc-runtime)
//! - Readiness probe: fixed delay, or HTTP polling when a URL is configured
//! - Codeception runner (via wpcc-runtime)
//!
//! Command handlers receive the composed `CliContext`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use wpcc_core::{
    GuardConfig, PathError, ProcessGuard, ServerDescriptor, StopPolicy,
    codecept_executable, selenium_executable,
};
use wpcc_runtime::{CodeceptionRunner, HttpReadinessProbe, SystemProcessInspector};

use crate::parser::Cli;

/// Matches at which Selenium counts as running. The native inspector never
/// reports wpcc itself, so a single match is the server.
const HEALTHY_MATCHES: usize = 1;

/// Install the stderr `tracing` subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `token` on the first Ctrl-C.
///
/// Codeception shares the terminal's process group and receives the
/// interrupt itself; the token drives the guard's cleanup.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cleaning up");
            token.cancel();
        }
    });
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Project root; Codeception runs from here.
    pub root: PathBuf,
    pub selenium_path: PathBuf,
    pub codecept_path: PathBuf,
    pub startup_grace: Duration,
    /// Readiness endpoint; `None` keeps the fixed startup delay.
    pub ready_url: Option<String>,
    pub ready_timeout: Duration,
    pub stop_policy: StopPolicy,
    pub use_lock: bool,
    pub lock_wait: Duration,
}

impl CliConfig {
    /// Resolve flags and environment against the current directory.
    pub fn from_cli(cli: &Cli) -> Result<Self, PathError> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()
                .map_err(|e| PathError::CurrentDirError(e.to_string()))?,
        };
        Ok(Self::resolve(cli, root))
    }

    fn resolve(cli: &Cli, root: PathBuf) -> Self {
        let selenium_path = cli
            .selenium_path
            .clone()
            .unwrap_or_else(|| selenium_executable(&root));
        let codecept_path = cli
            .codecept_path
            .clone()
            .unwrap_or_else(|| codecept_executable(&root));

        Self {
            selenium_path,
            codecept_path,
            startup_grace: Duration::from_millis(cli.startup_grace_ms),
            ready_url: cli.ready_url.clone().filter(|url| !url.trim().is_empty()),
            ready_timeout: Duration::from_secs(cli.ready_timeout_secs),
            stop_policy: if cli.only_stop_owned {
                StopPolicy::OnlyIfStartedByUs
            } else {
                StopPolicy::Always
            },
            use_lock: !cli.no_lock,
            lock_wait: Duration::from_secs(cli.lock_wait_secs),
            root,
        }
    }

    /// Descriptor of the Selenium server for this project.
    pub fn descriptor(&self) -> ServerDescriptor {
        ServerDescriptor::from_executable(&self.selenium_path)
            .with_startup_grace_period(self.startup_grace)
            .with_min_healthy_matches(HEALTHY_MATCHES)
    }

    pub fn guard_config(&self, keep_alive: bool) -> GuardConfig {
        GuardConfig::with_descriptor(self.descriptor())
            .with_keep_alive(keep_alive)
            .with_stop_policy(self.stop_policy)
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub guard: ProcessGuard,
    pub runner: CodeceptionRunner,
}

/// Bootstrap the CLI application.
///
/// Fails only when the HTTP readiness client cannot be built.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let inspector = Arc::new(SystemProcessInspector::new());

    let guard = match &config.ready_url {
        Some(url) => {
            let probe = HttpReadinessProbe::new(url.clone(), config.ready_timeout)
                .with_context(|| format!("building readiness probe for {url}"))?;
            debug!(url = probe.url(), timeout = ?config.ready_timeout, "Using HTTP readiness probe");
            ProcessGuard::new(inspector, Arc::new(probe))
        }
        None => {
            debug!(grace = ?config.startup_grace, "Using fixed startup delay");
            ProcessGuard::with_fixed_delay(inspector)
        }
    };

    let runner = CodeceptionRunner::new(&config.codecept_path, &config.root);

    Ok(CliContext {
        config,
        guard,
        runner,
    })
}
