//! `wpcc run`: Codeception inside a guarded Selenium lifetime.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wpcc_core::{RunArgs, locks_dir};
use wpcc_runtime::GuardLock;

use crate::bootstrap::CliContext;
use crate::commands::RunCommand;
use crate::error::CliError;

/// Execute the run command.
///
/// 1. Validate the Codeception arguments and executable
/// 2. Take the advisory lock for this Selenium launcher (unless disabled)
/// 3. Start Selenium if needed, run Codeception, stop Selenium unless kept alive
///
/// Returns Codeception's exit code.
pub async fn execute(
    ctx: &CliContext,
    command: RunCommand,
    cancel: &CancellationToken,
) -> Result<i32, CliError> {
    let args = RunArgs::new(command.suite, command.test, command.steps, command.debug)?;
    ctx.runner.ensure_available()?;

    let guard_config = ctx.config.guard_config(command.keep_alive);
    let pattern = guard_config.descriptor.match_pattern.clone();

    let _lock = if ctx.config.use_lock {
        let dir = locks_dir()?;
        let lock = GuardLock::acquire(&dir, &pattern, ctx.config.lock_wait, cancel).await?;
        debug!(path = %lock.path().display(), "Holding guard lock");
        Some(lock)
    } else {
        None
    };

    let runner = ctx.runner.clone();
    let code = ctx
        .guard
        .run_with_guarded_server(&guard_config, cancel, move || async move {
            runner.run(&args).await
        })
        .await
        .map_err(|err| {
            if err.is_cancelled() {
                warn!("Run interrupted; server stop step has run");
            }
            CliError::from(err)
        })?;

    info!(code, "Codeception run finished");
    Ok(code)
}
