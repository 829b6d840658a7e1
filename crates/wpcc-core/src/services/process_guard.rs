//! Start-if-absent / run / stop-unless-kept-alive guard for an auxiliary server.
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Starting -> Ready -> Running -> Stopping -> Idle
//!                                     \-> Ready (keep-alive)
//! ```
//!
//! `Starting -> Ready` is whatever the injected `ReadinessProbe` decides; with
//! `FixedDelay` it is only a sleep.
//!
//! # Concurrency
//!
//! The guard holds no in-process state between calls. Two invocations against
//! the same descriptor can race on the OS process table (both see "not
//! running", both spawn). Callers that need serialization take a lock keyed
//! by the match pattern around `run_with_guarded_server`.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{GuardConfig, ProcessSet, ServerDescriptor, StartOutcome, StopReport};
use crate::ports::{FixedDelay, GuardError, GuardedRunError, ProcessInspector, ReadinessProbe};

/// Guards a delegated task with an auxiliary server process.
#[derive(Clone)]
pub struct ProcessGuard {
    inspector: Arc<dyn ProcessInspector>,
    readiness: Arc<dyn ReadinessProbe>,
}

impl ProcessGuard {
    pub fn new(inspector: Arc<dyn ProcessInspector>, readiness: Arc<dyn ReadinessProbe>) -> Self {
        Self {
            inspector,
            readiness,
        }
    }

    /// Guard using the fixed startup delay as its readiness signal.
    pub fn with_fixed_delay(inspector: Arc<dyn ProcessInspector>) -> Self {
        Self::new(inspector, Arc::new(FixedDelay))
    }

    /// Processes currently matching the descriptor. Read-only.
    pub fn is_running(&self, descriptor: &ServerDescriptor) -> ProcessSet {
        let running = self.inspector.list_matching(&descriptor.match_pattern);
        debug!(
            pattern = %descriptor.match_pattern,
            matches = running.len(),
            "Queried process table"
        );
        running
    }

    /// Start the server unless enough matching processes already exist.
    ///
    /// After a spawn, blocks on the readiness probe; cancellation aborts that
    /// wait with `GuardError::Cancelled`. The spawned process is left for the
    /// caller's stop step in that case.
    pub async fn ensure_started(
        &self,
        descriptor: &ServerDescriptor,
        cancel: &CancellationToken,
    ) -> Result<StartOutcome, GuardError> {
        let path = descriptor.executable_path();
        if !self.inspector.is_executable(path) {
            return Err(GuardError::ExecutableNotFound {
                path: path.to_path_buf(),
            });
        }

        let running = self.is_running(descriptor);
        if descriptor.is_healthy(&running) {
            info!(
                pids = ?running.as_slice(),
                "Server already running, not starting another"
            );
            return Ok(StartOutcome::AlreadyRunning(running));
        }

        let pid = self
            .inspector
            .spawn_detached(path)
            .map_err(|e| GuardError::SpawnFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        info!(pid, path = %path.display(), "Started server");

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!(pid, "Cancelled while waiting for server startup");
                Err(GuardError::Cancelled)
            }
            ready = self.readiness.wait_ready(descriptor) => {
                ready?;
                debug!(pid, "Server ready");
                Ok(StartOutcome::Started { pid })
            }
        }
    }

    /// Send a termination request to every matching process.
    ///
    /// Best effort: individual failures are logged and recorded in the
    /// report, never returned as errors.
    pub fn ensure_stopped(&self, descriptor: &ServerDescriptor) -> StopReport {
        let running = self.is_running(descriptor);
        let mut report = StopReport::default();

        for pid in running.iter() {
            match self.inspector.terminate(pid) {
                Ok(()) => {
                    debug!(pid, "Sent termination signal");
                    report.signalled.push(pid);
                }
                Err(e) => {
                    warn!(pid, error = %e, "Failed to terminate server process");
                    report.failed.push(pid);
                }
            }
        }

        if report.attempted() > 0 {
            info!(
                stopped = report.signalled.len(),
                failed = report.failed.len(),
                "Server stop requested"
            );
        }
        report
    }

    /// Run `task` with the server guaranteed started, then stop it unless
    /// `config.keep_alive` (or the stop policy) says otherwise.
    ///
    /// - Start failures before any spawn short-circuit: no task, no stop.
    /// - The stop step runs exactly once on every later exit path, including
    ///   task failure, cancellation, a panicking task, or the returned future
    ///   being dropped.
    /// - The task's own result is returned; stop failures never alter it.
    pub async fn run_with_guarded_server<F, Fut, T, E>(
        &self,
        config: &GuardConfig,
        cancel: &CancellationToken,
        task: F,
    ) -> Result<T, GuardedRunError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut stop_on_exit = StopOnExit::new(self, config);

        match self.ensure_started(&config.descriptor, cancel).await {
            Ok(outcome) => stop_on_exit.outcome = Some(outcome),
            Err(err) => {
                if !err.requires_cleanup() {
                    stop_on_exit.disarm();
                }
                return Err(err.into());
            }
        }

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!("Cancelled while the task was running");
                Err(GuardedRunError::Guard(GuardError::Cancelled))
            }
            res = task() => res.map_err(GuardedRunError::Task),
        };

        drop(stop_on_exit);
        result
    }

    fn stop_after_run(&self, config: &GuardConfig, outcome: Option<&StartOutcome>) {
        if config.should_stop(outcome) {
            self.ensure_stopped(&config.descriptor);
        } else if config.keep_alive {
            info!("Keep-alive set, leaving server running");
        } else {
            info!("Server was not started by this run, leaving it running");
        }
    }
}

/// Runs the stop step when dropped, so it also happens on panic or drop.
struct StopOnExit<'a> {
    guard: &'a ProcessGuard,
    config: &'a GuardConfig,
    outcome: Option<StartOutcome>,
    armed: bool,
}

impl<'a> StopOnExit<'a> {
    const fn new(guard: &'a ProcessGuard, config: &'a GuardConfig) -> Self {
        Self {
            guard,
            config,
            outcome: None,
            armed: true,
        }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StopOnExit<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.guard.stop_after_run(self.config, self.outcome.as_ref());
        }
    }
}
