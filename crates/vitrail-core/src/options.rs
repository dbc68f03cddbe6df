//! Invocation flag parsing and the declarative flag-action table
//!
//! Flags form a closed set. Parsing keeps recognized flags in input
//! order, keeps duplicates, and silently drops everything else; the
//! planner walks the parsed list and materializes one step per flag
//! from the profile's `FlagAction` table.

use std::fmt;

use crate::plan::Position;

/// Recognized invocation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Normal,
    React,
    Vue,
    Hotwired,
    Docker,
    DockerEssential,
    DockerWithAdmin,
}

impl Flag {
    /// Parse a raw argument. Unrecognized arguments map to `None`.
    pub fn parse(raw: &str) -> Option<Flag> {
        match raw {
            "--normal" => Some(Flag::Normal),
            "--react" => Some(Flag::React),
            "--vue" => Some(Flag::Vue),
            "--hotwired" => Some(Flag::Hotwired),
            "--docker" => Some(Flag::Docker),
            "--docker-essential" => Some(Flag::DockerEssential),
            "--docker-with-admin" => Some(Flag::DockerWithAdmin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Normal => "--normal",
            Flag::React => "--react",
            Flag::Vue => "--vue",
            Flag::Hotwired => "--hotwired",
            Flag::Docker => "--docker",
            Flag::DockerEssential => "--docker-essential",
            Flag::DockerWithAdmin => "--docker-with-admin",
        }
    }

    /// Variant flags are mutually exclusive by policy. If several are
    /// supplied they all execute, and the last one wins on shared
    /// destinations because variant copies overwrite.
    pub fn is_variant(&self) -> bool {
        matches!(self, Flag::Normal | Flag::React | Flag::Vue)
    }

    /// The container profile a flag selects, if any.
    pub fn container_profile(&self) -> Option<ContainerProfile> {
        match self {
            Flag::Docker => Some(ContainerProfile::Full),
            Flag::DockerEssential => Some(ContainerProfile::Essential),
            Flag::DockerWithAdmin => Some(ContainerProfile::WithAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutually exclusive container service profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerProfile {
    Essential,
    WithAdmin,
    Full,
}

impl ContainerProfile {
    /// Human-readable service list for status lines.
    pub fn services(&self) -> &'static str {
        match self {
            ContainerProfile::Essential => "postgres & redis",
            ContainerProfile::WithAdmin => "postgres, redis, adminer & redis-commander",
            ContainerProfile::Full => "postgres, redis, adminer, redis-commander & mailhog",
        }
    }
}

/// The ordered set of recognized flags supplied by the invoker.
/// Immutable once parsed.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    flags: Vec<Flag>,
}

impl OptionSet {
    /// Parse raw invocation arguments. Unrecognized flags are silently
    /// ignored; duplicates and conflicting variants are kept in order.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Self {
        OptionSet {
            flags: raw.iter().filter_map(|s| Flag::parse(s.as_ref())).collect(),
        }
    }

    pub fn from_flags(flags: Vec<Flag>) -> Self {
        OptionSet { flags }
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// The container profile that ends up active. With several container
    /// flags the last one wins, matching the overwrite semantics of the
    /// compose-file copy.
    pub fn container_profile(&self) -> Option<ContainerProfile> {
        self.flags.iter().rev().find_map(|f| f.container_profile())
    }
}

/// A file copy planned by a flag: bundle source, target destination.
#[derive(Debug, Clone, Copy)]
pub struct CopySpec {
    pub src: &'static str,
    pub dest: &'static str,
    pub overwrite: bool,
}

/// A recursive directory merge planned by a flag. Merges always
/// overwrite per file.
#[derive(Debug, Clone, Copy)]
pub struct MergeSpec {
    pub src: &'static str,
    pub dest: &'static str,
}

/// A text injection planned by a flag.
#[derive(Debug, Clone, Copy)]
pub struct InjectSpec {
    pub target: &'static str,
    pub anchor: &'static str,
    pub payload: &'static str,
    pub position: Position,
}

/// Declarative description of everything one flag does. The planner
/// materializes these into plan steps, so flag behavior is data, not
/// branching logic.
#[derive(Debug, Clone, Copy)]
pub struct FlagAction {
    pub flag: Flag,
    /// Step title shown while executing.
    pub title: &'static str,
    pub copies: &'static [CopySpec],
    pub merges: &'static [MergeSpec],
    pub injects: &'static [InjectSpec],
    /// Dependency installs; failure aborts the run.
    pub commands: &'static [&'static [&'static str]],
    /// Commands whose failure is logged and ignored.
    pub tolerated_commands: &'static [&'static [&'static str]],
    /// Container flags start the stack and provision database roles
    /// after their file operations.
    pub starts_containers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_flags_in_order() {
        let raw = ["--vue".to_string(), "--docker-essential".to_string()];
        let options = OptionSet::parse(&raw);
        assert_eq!(options.flags(), &[Flag::Vue, Flag::DockerEssential]);
    }

    #[test]
    fn test_unknown_flags_silently_ignored() {
        let raw = [
            "--vue".to_string(),
            "--turbo-mode".to_string(),
            "extra".to_string(),
        ];
        let options = OptionSet::parse(&raw);
        assert_eq!(options.flags(), &[Flag::Vue]);
    }

    #[test]
    fn test_duplicates_and_conflicts_are_kept() {
        let raw = [
            "--react".to_string(),
            "--vue".to_string(),
            "--react".to_string(),
        ];
        let options = OptionSet::parse(&raw);
        assert_eq!(options.flags(), &[Flag::React, Flag::Vue, Flag::React]);
    }

    #[test]
    fn test_last_container_flag_wins() {
        let raw = ["--docker-essential".to_string(), "--docker".to_string()];
        let options = OptionSet::parse(&raw);
        assert_eq!(options.container_profile(), Some(ContainerProfile::Full));
    }

    #[test]
    fn test_no_container_profile_without_docker_flags() {
        let raw = ["--vue".to_string()];
        let options = OptionSet::parse(&raw);
        assert_eq!(options.container_profile(), None);
    }

    #[test]
    fn test_variant_classification() {
        assert!(Flag::Normal.is_variant());
        assert!(Flag::React.is_variant());
        assert!(Flag::Vue.is_variant());
        assert!(!Flag::Hotwired.is_variant());
        assert!(!Flag::DockerEssential.is_variant());
    }

    #[test]
    fn test_flag_round_trip() {
        for flag in [
            Flag::Normal,
            Flag::React,
            Flag::Vue,
            Flag::Hotwired,
            Flag::Docker,
            Flag::DockerEssential,
            Flag::DockerWithAdmin,
        ] {
            assert_eq!(Flag::parse(flag.as_str()), Some(flag));
        }
    }
}
