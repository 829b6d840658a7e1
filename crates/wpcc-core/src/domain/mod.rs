//! Domain types for the guarded server lifecycle.
//!
//! These types describe *what* the guard manages, never *how*: no process
//! handles, no OS calls.

mod codeception;
mod guard;
mod server;

pub use codeception::{RunArgs, RunArgsError};
pub use guard::{GuardConfig, StartOutcome, StopPolicy, StopReport};
pub use server::{
    DEFAULT_LIVENESS_CHECK_INTERVAL, DEFAULT_MIN_HEALTHY_MATCHES, DEFAULT_STARTUP_GRACE_PERIOD,
    Pid, ProcessSet, ServerDescriptor,
};
