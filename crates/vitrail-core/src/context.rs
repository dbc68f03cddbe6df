//! Explicit run state passed to every component
//!
//! No ambient process state (cwd changes, global flag lists): one
//! `RunContext` value is owned by the workflow and passed by reference
//! to the engine, runner, and reporter.

use std::env;
use std::path::PathBuf;

use crate::options::OptionSet;

/// Database and identity overrides, read from the environment once at
/// startup. The generated app reads the same variables at runtime; the
/// scaffolder itself only needs them for role provisioning and the
/// readiness probe.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub database_user: Option<String>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub os_user: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        EnvOverrides {
            database_user: non_empty(env::var("DATABASE_USER").ok()),
            database_host: non_empty(env::var("DATABASE_HOST").ok()),
            database_port: env::var("DATABASE_PORT").ok().and_then(|v| v.parse().ok()),
            os_user: non_empty(env::var("USER").ok()),
        }
    }

    /// Role used to connect while provisioning: `DATABASE_USER`, then
    /// the OS user, then `postgres`.
    pub fn connect_user(&self) -> &str {
        self.database_user
            .as_deref()
            .or(self.os_user.as_deref())
            .unwrap_or("postgres")
    }

    pub fn host(&self) -> &str {
        self.database_host.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn port(&self) -> u16 {
        self.database_port.unwrap_or(5432)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Everything a scaffolding run needs: the target tree, the resolved
/// bundle root, the parsed option set, and the environment overrides.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub target_dir: PathBuf,
    pub source_root: PathBuf,
    pub options: OptionSet,
    pub env: EnvOverrides,
}
