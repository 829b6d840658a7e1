//! OS adapters for wpcc: process table access, readiness probing, the
//! advisory guard lock, and the Codeception task runner.

#![deny(unsafe_code)]

pub mod codeception;
pub mod lock;
pub mod process;
pub mod readiness;

pub use codeception::{CodeceptionError, CodeceptionRunner};
pub use lock::{GuardLock, LockAttempt, LockError};
pub use process::{SystemProcessInspector, is_executable, pid_exists, terminate_pid};
pub use readiness::HttpReadinessProbe;
