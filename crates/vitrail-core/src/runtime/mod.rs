//! Host tool detection
//!
//! Probes the external tools a scaffolding run leans on (git, Node.js,
//! Docker, the PostgreSQL client) before any mutation happens.

pub mod check;

pub use check::{
    check_createuser, check_direnv, check_docker, check_git, check_node, check_tools, check_yarn,
    ToolInfo,
};
