//! External command execution and service readiness
//!
//! This module provides:
//! - `CommandRunner` for plan commands with fatal/tolerated policy
//! - A bounded TCP readiness poll for freshly started services

pub mod readiness;
pub mod runner;

pub use readiness::wait_for_tcp;
pub use runner::{CommandRunner, ExecError, ExecOutcome};
