//! Tool availability probing

use anyhow::Result;
use std::fmt;
use std::process::Command;

use crate::options::OptionSet;

/// Tool detection result.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl fmt::Display for ToolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.available {
            write!(f, "{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            write!(f, "{} (not installed)", self.name)
        }
    }
}

fn probe(binary: &str, name: &'static str) -> ToolInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            ToolInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => ToolInfo {
            name,
            version: None,
            available: false,
        },
    }
}

pub fn check_git() -> ToolInfo {
    probe("git", "Git")
}

pub fn check_node() -> ToolInfo {
    probe("node", "Node.js")
}

pub fn check_yarn() -> ToolInfo {
    probe("yarn", "Yarn")
}

pub fn check_docker() -> ToolInfo {
    probe("docker", "Docker")
}

pub fn check_direnv() -> ToolInfo {
    probe("direnv", "direnv")
}

pub fn check_createuser() -> ToolInfo {
    probe("createuser", "PostgreSQL client tools")
}

/// Probe the tools a run needs. Git and Node.js are required — without
/// them neither the template clone nor the frontend install can work.
/// Everything else is advisory: availability is reported here, and the
/// dependent steps degrade to warnings at execution time.
pub fn check_tools(options: &OptionSet) -> Result<Vec<ToolInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    let git = check_git();
    if git.available {
        results.push(git);
    } else {
        missing.push("Git (install from https://git-scm.com)");
    }

    let node = check_node();
    if node.available {
        results.push(node);
    } else {
        missing.push("Node.js (install from https://nodejs.org)");
    }

    // Corepack can provision yarn, so its absence is only informational.
    results.push(check_yarn());

    if options.container_profile().is_some() {
        results.push(check_docker());
        results.push(check_direnv());
        results.push(check_createuser());
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}
