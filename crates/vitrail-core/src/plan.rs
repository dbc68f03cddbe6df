//! Plan types: file operations, command invocations, and the ordered
//! step list the orchestrator executes
//!
//! A `Plan` is a totally ordered list of steps, executed top to bottom
//! with no parallelism. Planning is pure — file paths stay relative to
//! the bundle root and target tree until execution binds them.

use std::fmt;
use std::path::PathBuf;

use crate::options::{ContainerProfile, FlagAction, OptionSet};
use crate::profile::ScaffoldProfile;

/// Insertion side relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

/// A single mutation of the target project tree.
#[derive(Debug, Clone)]
pub enum FileOperation {
    /// Copy one bundle file to the target. With `overwrite` unset an
    /// existing destination makes this a silent no-op.
    Copy {
        src: PathBuf,
        dest: PathBuf,
        overwrite: bool,
    },
    /// Recursively copy every file under a bundle directory into the
    /// target, applying the overwrite policy per file.
    MergeDirectory {
        src: PathBuf,
        dest: PathBuf,
        overwrite: bool,
    },
    /// Insert a payload before or after the first occurrence of an
    /// anchor string in a target file.
    InjectText {
        target: PathBuf,
        anchor: String,
        payload: String,
        position: Position,
    },
    /// Rename every file under a target directory from one extension to
    /// another. Used to turn placeholder generator templates live after
    /// plain-copy placement.
    RenameByExtension {
        dir: PathBuf,
        from_ext: String,
        to_ext: String,
    },
}

impl FileOperation {
    pub fn copy(src: &str, dest: &str) -> Self {
        FileOperation::Copy {
            src: src.into(),
            dest: dest.into(),
            overwrite: false,
        }
    }

    pub fn copy_forced(src: &str, dest: &str) -> Self {
        FileOperation::Copy {
            src: src.into(),
            dest: dest.into(),
            overwrite: true,
        }
    }

    pub fn merge(src: &str, dest: &str) -> Self {
        FileOperation::MergeDirectory {
            src: src.into(),
            dest: dest.into(),
            overwrite: true,
        }
    }

    pub fn inject_after(target: &str, anchor: &str, payload: &str) -> Self {
        FileOperation::InjectText {
            target: target.into(),
            anchor: anchor.into(),
            payload: payload.into(),
            position: Position::After,
        }
    }

    pub fn inject_before(target: &str, anchor: &str, payload: &str) -> Self {
        FileOperation::InjectText {
            target: target.into(),
            anchor: anchor.into(),
            payload: payload.into(),
            position: Position::Before,
        }
    }

    pub fn rename_extension(dir: &str, from_ext: &str, to_ext: &str) -> Self {
        FileOperation::RenameByExtension {
            dir: dir.into(),
            from_ext: from_ext.into(),
            to_ext: to_ext.into(),
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOperation::Copy {
                src,
                dest,
                overwrite,
            } => {
                let policy = if *overwrite { "overwrite" } else { "keep existing" };
                write!(f, "copy {} -> {} ({})", src.display(), dest.display(), policy)
            }
            FileOperation::MergeDirectory { src, dest, .. } => {
                write!(f, "merge {}/ -> {}/", src.display(), dest.display())
            }
            FileOperation::InjectText {
                target,
                anchor,
                position,
                ..
            } => {
                let side = match position {
                    Position::Before => "before",
                    Position::After => "after",
                };
                let anchor_line = anchor.lines().next().unwrap_or(anchor.as_str());
                write!(f, "inject into {} {} `{}`", target.display(), side, anchor_line)
            }
            FileOperation::RenameByExtension {
                dir,
                from_ext,
                to_ext,
            } => {
                write!(f, "rename *.{} -> *.{} under {}", from_ext, to_ext, dir.display())
            }
        }
    }
}

/// One external command plus its failure policy.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub argv: Vec<String>,
    /// Non-zero exit aborts the whole run when set; otherwise the
    /// failure is logged and the run continues.
    pub fatal_on_error: bool,
    /// Suppress the command's output instead of streaming it.
    pub capture_output: bool,
}

impl CommandInvocation {
    pub fn fatal(argv: &[&str]) -> Self {
        CommandInvocation {
            argv: argv.iter().map(|s| (*s).to_string()).collect(),
            fatal_on_error: true,
            capture_output: false,
        }
    }

    pub fn tolerated(argv: &[&str]) -> Self {
        CommandInvocation {
            argv: argv.iter().map(|s| (*s).to_string()).collect(),
            fatal_on_error: false,
            capture_output: false,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.capture_output = true;
        self
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// One entry of the ordered plan.
#[derive(Debug, Clone)]
pub enum PlanItem {
    File(FileOperation),
    Command(CommandInvocation),
    /// Start the selected container stack and provision database roles.
    StartContainers(ContainerProfile),
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanItem::File(op) => write!(f, "{op}"),
            PlanItem::Command(invocation) => {
                if invocation.fatal_on_error {
                    write!(f, "run: {invocation}")
                } else {
                    write!(f, "run: {invocation} (tolerated)")
                }
            }
            PlanItem::StartContainers(profile) => {
                write!(
                    f,
                    "start containers ({}) and provision database roles",
                    profile.services()
                )
            }
        }
    }
}

/// A titled group of plan items, reported as one unit of progress.
#[derive(Debug, Clone)]
pub struct Step {
    pub title: String,
    pub items: Vec<PlanItem>,
}

impl Step {
    pub fn new(title: impl Into<String>) -> Self {
        Step {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn file(mut self, op: FileOperation) -> Self {
        self.items.push(PlanItem::File(op));
        self
    }

    pub fn command(mut self, invocation: CommandInvocation) -> Self {
        self.items.push(PlanItem::Command(invocation));
        self
    }
}

/// The totally ordered action plan for one scaffolding run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    /// Assemble the full fixed sequence: dependency installs, framework
    /// setup, flag-driven steps in input order, base template copies,
    /// database/auth integration, then version-control finalization.
    pub fn build<P: ScaffoldProfile>(profile: &P, options: &OptionSet) -> Plan {
        let mut steps = profile.prelude_steps();
        steps.extend(profile.framework_steps());
        steps.extend(flag_steps(profile.flag_actions(), options));
        steps.extend(profile.base_template_steps());
        steps.extend(profile.integration_steps());
        steps.extend(profile.finalize_steps());
        Plan { steps }
    }

    /// Dry-run listing of every step and item, in execution order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("{:2}. {}\n", i + 1, step.title));
            for item in &step.items {
                out.push_str(&format!("      {item}\n"));
            }
        }
        out
    }
}

/// Materialize one step per recognized flag, in input order. Containers
/// are started once, at the last container flag's step, so the compose
/// file that wins the copy race is the one that runs.
fn flag_steps(table: &[FlagAction], options: &OptionSet) -> Vec<Step> {
    let last_container = options
        .flags()
        .iter()
        .rposition(|f| f.container_profile().is_some());

    let mut steps = Vec::new();
    for (index, flag) in options.flags().iter().enumerate() {
        let Some(action) = table.iter().find(|a| a.flag == *flag) else {
            continue;
        };

        let mut step = Step::new(action.title);
        for spec in action.copies {
            step.items.push(PlanItem::File(FileOperation::Copy {
                src: spec.src.into(),
                dest: spec.dest.into(),
                overwrite: spec.overwrite,
            }));
        }
        for spec in action.merges {
            step.items
                .push(PlanItem::File(FileOperation::merge(spec.src, spec.dest)));
        }
        for spec in action.injects {
            step.items.push(PlanItem::File(FileOperation::InjectText {
                target: spec.target.into(),
                anchor: spec.anchor.into(),
                payload: spec.payload.into(),
                position: spec.position,
            }));
        }
        for argv in action.commands {
            step.items
                .push(PlanItem::Command(CommandInvocation::fatal(argv)));
        }
        for argv in action.tolerated_commands {
            step.items
                .push(PlanItem::Command(CommandInvocation::tolerated(argv)));
        }
        if action.starts_containers && Some(index) == last_container {
            if let Some(profile) = flag.container_profile() {
                step.items.push(PlanItem::StartContainers(profile));
            }
        }
        steps.push(step);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ContainerProfile, CopySpec, Flag};

    const TEST_TABLE: &[FlagAction] = &[
        FlagAction {
            flag: Flag::Vue,
            title: "Configure Vue",
            copies: &[CopySpec {
                src: "vite.config-vue.ts",
                dest: "vite.config.ts",
                overwrite: true,
            }],
            merges: &[],
            injects: &[],
            commands: &[&["yarn", "add", "vue"]],
            tolerated_commands: &[],
            starts_containers: false,
        },
        FlagAction {
            flag: Flag::DockerEssential,
            title: "Configure Docker (essential)",
            copies: &[CopySpec {
                src: "docker-compose.essential.yml",
                dest: "docker-compose.yml",
                overwrite: true,
            }],
            merges: &[],
            injects: &[],
            commands: &[],
            tolerated_commands: &[],
            starts_containers: true,
        },
        FlagAction {
            flag: Flag::Docker,
            title: "Configure Docker (full)",
            copies: &[CopySpec {
                src: "docker-compose.yml",
                dest: "docker-compose.yml",
                overwrite: true,
            }],
            merges: &[],
            injects: &[],
            commands: &[],
            tolerated_commands: &[],
            starts_containers: true,
        },
    ];

    fn container_items(steps: &[Step]) -> Vec<ContainerProfile> {
        steps
            .iter()
            .flat_map(|s| s.items.iter())
            .filter_map(|item| match item {
                PlanItem::StartContainers(profile) => Some(*profile),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_flag_steps_follow_input_order() {
        let options = OptionSet::from_flags(vec![Flag::DockerEssential, Flag::Vue]);
        let steps = flag_steps(TEST_TABLE, &options);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "Configure Docker (essential)");
        assert_eq!(steps[1].title, "Configure Vue");
    }

    #[test]
    fn test_containers_start_once_at_last_container_step() {
        let options =
            OptionSet::from_flags(vec![Flag::DockerEssential, Flag::Vue, Flag::Docker]);
        let steps = flag_steps(TEST_TABLE, &options);
        assert_eq!(container_items(&steps), vec![ContainerProfile::Full]);

        // The StartContainers item lives in the last docker step.
        let last = steps.last().unwrap();
        assert!(last
            .items
            .iter()
            .any(|i| matches!(i, PlanItem::StartContainers(_))));
    }

    #[test]
    fn test_flags_without_table_entry_are_skipped() {
        let options = OptionSet::from_flags(vec![Flag::Hotwired, Flag::Vue]);
        let steps = flag_steps(TEST_TABLE, &options);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].title, "Configure Vue");
    }

    #[test]
    fn test_duplicate_flags_execute_twice() {
        let options = OptionSet::from_flags(vec![Flag::Vue, Flag::Vue]);
        let steps = flag_steps(TEST_TABLE, &options);
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_command_policy_materialization() {
        let options = OptionSet::from_flags(vec![Flag::Vue]);
        let steps = flag_steps(TEST_TABLE, &options);
        let commands: Vec<&CommandInvocation> = steps[0]
            .items
            .iter()
            .filter_map(|item| match item {
                PlanItem::Command(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].fatal_on_error);
        assert_eq!(commands[0].argv, vec!["yarn", "add", "vue"]);
    }

    #[test]
    fn test_render_lists_steps_in_order() {
        let plan = Plan {
            steps: vec![
                Step::new("First").file(FileOperation::copy("a", "b")),
                Step::new("Second").command(CommandInvocation::tolerated(&["git", "add", "."])),
            ],
        };
        let rendered = plan.render();
        let first = rendered.find("First").unwrap();
        let second = rendered.find("Second").unwrap();
        assert!(first < second);
        assert!(rendered.contains("copy a -> b (keep existing)"));
        assert!(rendered.contains("run: git add . (tolerated)"));
    }
}
