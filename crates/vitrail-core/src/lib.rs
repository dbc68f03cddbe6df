//! Vitrail Core - Shared library for flag-driven application scaffolding
//!
//! This library turns a freshly generated application tree into a
//! pre-configured skeleton by executing a totally ordered plan of file
//! copies, directory merges, anchor-based text injections, and external
//! commands. It is designed to be used by product binaries (e.g.
//! `vitrail-create`) that share the engine but own the product data.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Pure plan/option types, the file
//!   operation engine, the command runner, source resolution
//! - **Layer 2: Workflow Orchestration** - `ScaffoldProfile` trait and
//!   the plan executor for custom UIs
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based workflow
//!   (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based workflow module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use vitrail_core::{OptionSet, Plan, ScaffoldProfile};
//!
//! // Define your product profile
//! #[derive(Clone)]
//! struct MyProfile;
//! impl ScaffoldProfile for MyProfile {
//!     fn name(&self) -> &'static str { "myapp" }
//!     // ... implement other methods
//! }
//!
//! // Use the low-level APIs
//! let options = OptionSet::parse(&flags);
//! let plan = Plan::build(&MyProfile, &options);
//! ```

pub mod cleanup;
pub mod context;
pub mod exec;
pub mod fsops;
pub mod options;
pub mod plan;
pub mod profile;
pub mod report;
pub mod runtime;
pub mod scaffold;
pub mod source;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use context::{EnvOverrides, RunContext};
pub use options::{ContainerProfile, Flag, FlagAction, OptionSet};
pub use plan::{CommandInvocation, FileOperation, Plan, PlanItem, Position, Step};
pub use profile::ScaffoldProfile;
pub use scaffold::RunReport;
pub use source::{BundleManifest, ResolvedSource, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version fallback - used for bundle compatibility checking when a
/// binary does not define its own
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
