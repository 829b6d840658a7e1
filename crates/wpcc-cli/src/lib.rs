//! `wpcc`: run Codeception with a Selenium server guarded around it.
//!
//! The binary in `main.rs` parses arguments, bootstraps a [`CliContext`] and
//! dispatches to [`handlers`]. Everything testable lives in this library.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap, cancel_on_ctrl_c, init_logging};
pub use commands::{Commands, RunCommand};
pub use error::{CliError, exit_status};
pub use parser::Cli;
