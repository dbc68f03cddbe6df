//! Scaffold profile trait for product binaries
//!
//! A profile supplies everything product-specific: the template source,
//! the fixed step sequence's contents, the flag-action table, and the
//! user-facing messages. The engine stays generic; the binary owns the
//! data.

use std::path::Path;

use crate::options::{Flag, FlagAction};
use crate::plan::Step;

/// Configuration trait implemented by each scaffold product.
pub trait ScaffoldProfile: Clone + Send + Sync + 'static {
    /// Internal product name (used for env vars, temp prefixes)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Default template repository URL
    fn default_template_url(&self) -> &'static str;

    /// Environment variable overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// Upgrade command shown in bundle version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Dependency installs that must land before any other work.
    /// Failure here aborts the run.
    fn prelude_steps(&self) -> Vec<Step>;

    /// Framework-level setup: app configuration injection, base
    /// generators, version files.
    fn framework_steps(&self) -> Vec<Step>;

    /// The declarative flag table; one entry per recognized flag that
    /// plans work.
    fn flag_actions(&self) -> &'static [FlagAction];

    /// Base template copies plus frontend toolchain finalization.
    fn base_template_steps(&self) -> Vec<Step>;

    /// Database, authentication, and storage integration.
    fn integration_steps(&self) -> Vec<Step>;

    /// Version-control finalization. Every command here is tolerated.
    fn finalize_steps(&self) -> Vec<Step>;

    /// Database roles provisioned after the container stack is up.
    fn database_roles(&self) -> &'static [&'static str] {
        &["postgres", "root"]
    }

    /// Summary line for an activated flag, if it has one.
    fn summary_line(&self, flag: Flag) -> Option<&'static str>;

    /// Post-run guidance.
    fn next_steps(&self, dir: &Path) -> Vec<String>;
}
