//! Readiness port: decides when a freshly spawned server may be used.

use async_trait::async_trait;
use tracing::debug;

use super::GuardError;
use crate::domain::ServerDescriptor;

/// Waits until a newly spawned server can accept work.
///
/// Implementations must be cancel-safe: the guard drops the future when the
/// run is cancelled.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn wait_ready(&self, descriptor: &ServerDescriptor) -> Result<(), GuardError>;
}

/// Sleeps for the descriptor's startup grace period and reports ready.
///
/// There is no real readiness signal here; a slow machine can outlast the
/// delay. Use an HTTP probe where the server exposes a status endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelay;

#[async_trait]
impl ReadinessProbe for FixedDelay {
    async fn wait_ready(&self, descriptor: &ServerDescriptor) -> Result<(), GuardError> {
        debug!(
            grace_ms = descriptor.startup_grace_period.as_millis(),
            "Waiting fixed grace period for server startup"
        );
        tokio::time::sleep(descriptor.startup_grace_period).await;
        Ok(())
    }
}
