//! Core domain for wpcc: the auxiliary-server guard that wraps a Codeception run.
//!
//! This crate owns the domain types, the ports the guard depends on, and the
//! `ProcessGuard` service itself. It contains no OS-specific code; adapters
//! live in `wpcc-runtime`.

#![deny(unsafe_code)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_LIVENESS_CHECK_INTERVAL, DEFAULT_MIN_HEALTHY_MATCHES, DEFAULT_STARTUP_GRACE_PERIOD,
    GuardConfig, Pid, ProcessSet, RunArgs, RunArgsError, ServerDescriptor, StartOutcome,
    StopPolicy, StopReport,
};
pub use paths::{
    PathError, codecept_executable, data_root, locks_dir, locks_dir_in, selenium_executable,
};
pub use ports::{FixedDelay, GuardError, GuardedRunError, ProcessError, ProcessInspector, ReadinessProbe};
pub use services::ProcessGuard;


