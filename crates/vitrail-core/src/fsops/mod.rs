//! File operations against the target project tree
//!
//! This module provides:
//! - The pure anchor-injection function with duplicate detection
//! - `FileOpEngine`, which executes plan operations with per-operation
//!   overwrite policy and reports explicit outcomes

pub mod engine;
pub mod inject;

pub use engine::FileOpEngine;
pub use inject::{inject, InjectResult};

use std::path::PathBuf;
use thiserror::Error;

/// Why an operation was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Destination exists and the operation does not overwrite.
    DestinationExists,
    /// The injection payload is already present in the target.
    PayloadPresent,
    /// The injection anchor was not found; target left unmodified.
    AnchorMissing,
    /// The operation's target file or directory does not exist.
    TargetMissing,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::DestinationExists => "destination already exists, keeping it",
            SkipReason::PayloadPresent => "payload already present, not injecting again",
            SkipReason::AnchorMissing => "anchor not found, file left unchanged",
            SkipReason::TargetMissing => "target does not exist, nothing to do",
        }
    }

    /// Skips worth a warning line. Existing destinations and
    /// already-present payloads are expected on reruns and stay silent.
    pub fn warrants_warning(&self) -> bool {
        matches!(self, SkipReason::AnchorMissing | SkipReason::TargetMissing)
    }
}

/// Outcome of one file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    Applied,
    Skipped(SkipReason),
}

/// Errors that abort a file operation. These are fatal: they mean the
/// bundle or the target tree is broken, not that a feature is absent.
#[derive(Debug, Error)]
pub enum OpError {
    #[error("source path missing from template bundle: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("{}: not valid UTF-8, cannot inject text", .path.display())]
    NonUtf8Target { path: PathBuf },
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
