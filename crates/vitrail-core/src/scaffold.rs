//! Plan execution
//!
//! Executes a `Plan` top to bottom against the target tree. Fatal
//! failures abort with context; everything in the recoverable taxonomy
//! (missing anchors, absent Docker, failed commit) becomes a warning and
//! the run keeps going.

use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::context::RunContext;
use crate::exec::{readiness, CommandRunner, ExecOutcome};
use crate::fsops::{FileOpEngine, OpOutcome};
use crate::options::ContainerProfile;
use crate::plan::{CommandInvocation, FileOperation, Plan, PlanItem};
use crate::profile::ScaffoldProfile;

/// How long to wait for the database container to accept connections.
const DB_READY_DEADLINE: Duration = Duration::from_secs(60);

/// Tally of what a run did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub applied: usize,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl RunReport {
    fn warn(&mut self, message: String) {
        eprintln!("  {} {}", "warning:".yellow(), message);
        self.warnings.push(message);
    }
}

/// Execute a plan. The engine and runner are the only writers against
/// the target tree, and execution is strictly sequential.
pub async fn execute<P: ScaffoldProfile>(
    profile: &P,
    ctx: &RunContext,
    plan: &Plan,
) -> Result<RunReport> {
    let engine = FileOpEngine::new(&ctx.source_root, &ctx.target_dir);
    let runner = CommandRunner::new(&ctx.target_dir);
    let mut report = RunReport::default();

    for step in &plan.steps {
        println!("{} {}", "→".cyan(), step.title.cyan());
        for item in &step.items {
            match item {
                PlanItem::File(op) => apply_file_op(&engine, op, &mut report).await?,
                PlanItem::Command(invocation) => {
                    match runner.run(invocation).await {
                        Ok(ExecOutcome::Success) => report.applied += 1,
                        Ok(ExecOutcome::Failed) => {
                            // The runner already printed the warning line.
                            report.warnings.push(format!("`{invocation}` failed"));
                        }
                        Err(err) => {
                            return Err(err)
                                .with_context(|| format!("step `{}` failed", step.title));
                        }
                    }
                }
                PlanItem::StartContainers(kind) => {
                    start_containers(profile, *kind, ctx, &runner, &mut report).await;
                }
            }
        }
    }

    Ok(report)
}

async fn apply_file_op(
    engine: &FileOpEngine,
    op: &FileOperation,
    report: &mut RunReport,
) -> Result<()> {
    match engine.apply(op).await {
        Ok(OpOutcome::Applied) => {
            report.applied += 1;
            Ok(())
        }
        Ok(OpOutcome::Skipped(reason)) => {
            report.skipped += 1;
            if reason.warrants_warning() {
                report.warn(format!("{op}: {}", reason.describe()));
            }
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("failed to {op}")),
    }
}

/// Start the selected container stack and provision database roles.
/// Nothing in here is fatal: an absent engine, a slow database, or a
/// failed `createuser` degrades to a warning and the scaffold goes on.
async fn start_containers<P: ScaffoldProfile>(
    profile: &P,
    kind: ContainerProfile,
    ctx: &RunContext,
    runner: &CommandRunner,
    report: &mut RunReport,
) {
    if !CommandRunner::which("docker") {
        report.warn(format!(
            "Docker is not installed; skipping the {} stack and database role provisioning",
            kind.services()
        ));
        return;
    }

    println!(
        "  {}",
        format!("Starting Docker containers ({})", kind.services()).cyan()
    );
    let up = CommandInvocation::tolerated(&[
        "docker", "compose", "--profile", "essential", "up", "-d",
    ]);
    match runner.run(&up).await {
        Ok(ExecOutcome::Success) => {}
        _ => {
            report.warn("failed to start Docker containers; skipping role provisioning".to_string());
            return;
        }
    }

    let host = ctx.env.host().to_string();
    let port = ctx.env.port();
    if let Err(err) = readiness::wait_for_tcp(&host, port, DB_READY_DEADLINE).await {
        report.warn(format!("{err}; skipping database role provisioning"));
        return;
    }

    if !CommandRunner::which("createuser") {
        report.warn("createuser not found; skipping database role provisioning".to_string());
        return;
    }

    let port_str = port.to_string();
    let connect_user = ctx.env.connect_user().to_string();
    for &role in profile.database_roles() {
        let invocation = CommandInvocation::tolerated(&[
            "createuser",
            "--createdb",
            "--no-createrole",
            "--superuser",
            role,
            "-h",
            host.as_str(),
            "-p",
            port_str.as_str(),
            "-U",
            connect_user.as_str(),
        ]);
        if let Ok(ExecOutcome::Failed) = runner.run(&invocation).await {
            report
                .warnings
                .push(format!("failed to provision database role `{role}`"));
        }
    }
}
