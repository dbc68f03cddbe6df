//! vitrail CLI - Scaffold a Rails 7 + ViteJS + Tailwindcss application

mod profile;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vitrail_core::tui::CreateArgs;
use vitrail_core::{OptionSet, Plan};

use crate::profile::VitrailProfile;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "vitrail-create")]
#[command(about = "Scaffold a Rails 7 + ViteJS + Tailwindcss application")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold into a freshly generated application
    Create(CliCreateArgs),
    /// Print the action plan for a set of feature flags without executing it
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Local directory to use for templates instead of cloning a repository (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template repository URL override
    #[arg(long = "template-url")]
    pub template_url: Option<String>,

    /// Application directory to scaffold into (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Skip the tool availability check
    #[arg(long = "skip-tool-check")]
    pub skip_tool_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Feature flags: --normal, --react, --vue, --hotwired, --docker,
    /// --docker-essential, --docker-with-admin. Unknown flags are ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub flags: Vec<String>,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template_url: args.template_url,
            directory: args.directory,
            flags: args.flags,
            skip_tool_check: args.skip_tool_check,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Feature flags to plan for
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub flags: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully: remove any cloned template checkout,
    // restore the cursor, exit with the conventional interrupt status
    ctrlc::set_handler(move || {
        vitrail_core::cleanup::remove_tracked();
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let profile = VitrailProfile;

    match args.command {
        Some(Command::Create(create_args)) => {
            let result = vitrail_core::run(&profile, create_args.into(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::Plan(plan_args)) => {
            let options = OptionSet::parse(&plan_args.flags);
            let plan = Plan::build(&profile, &options);
            print!("{}", plan.render());
            Ok(())
        }
        None => {
            // No subcommand provided, default to create behavior (interactive mode)
            let result = vitrail_core::run(&profile, CreateArgs::default(), CLI_VERSION).await;

            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
