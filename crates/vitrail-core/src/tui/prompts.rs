//! Charm-style CLI workflow using cliclack

use std::path::PathBuf;

use anyhow::Result;

use crate::context::{EnvOverrides, RunContext};
use crate::exec::CommandRunner;
use crate::options::OptionSet;
use crate::plan::Plan;
use crate::profile::ScaffoldProfile;
use crate::report;
use crate::runtime::check;
use crate::scaffold;
use crate::source::{self, manifest, TemplateSource};

/// Arguments for the create workflow.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of cloning a repository
    pub template_dir: Option<PathBuf>,

    /// Template repository URL override
    pub template_url: Option<String>,

    /// Application directory to scaffold into (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Raw feature flags (closed set; unknown flags are ignored)
    pub flags: Vec<String>,

    /// Skip the tool availability check
    pub skip_tool_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the scaffold workflow with interactive prompts.
pub async fn run<P: ScaffoldProfile>(profile: &P, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(profile.display_name())?;

    // Step 1: Parse feature flags (unknowns are ignored by contract)
    let options = OptionSet::parse(&args.flags);
    if !options.is_empty() {
        let names: Vec<&str> = options.flags().iter().map(|f| f.as_str()).collect();
        cliclack::log::info(format!("Selected options: {}", names.join(" ")))?;
    }

    // Step 2: Check tool availability
    if args.skip_tool_check {
        cliclack::log::info("Skipping tool check")?;
    } else {
        check_tools(&options)?;
    }

    // Step 3: Validate the target directory
    let target_dir = select_directory(&args)?;

    // Step 4: Resolve the template source
    let source = TemplateSource::select(
        args.template_dir.as_deref(),
        args.template_url.as_deref(),
        profile.template_url_env(),
        profile.default_template_url(),
    )?;
    if let TemplateSource::Local(dir) = &source {
        cliclack::log::info(format!("Using local templates from {}", dir.display()))?;
    }

    let runner = CommandRunner::new(&target_dir);
    let spinner = cliclack::spinner();
    spinner.start("Resolving template source...");
    let resolved = match source::resolve(&source, &runner).await {
        Ok(resolved) => {
            spinner.stop(format!("Templates: {}", resolved.root().display()));
            resolved
        }
        Err(err) => {
            spinner.stop("Failed to resolve template source");
            return Err(err);
        }
    };

    // Step 5: Bundle manifest and version compatibility
    match manifest::load(resolved.root())? {
        Some(bundle) => {
            cliclack::log::info(format!("Bundle: {} - {}", bundle.name, bundle.description))?;
            if let Some(warning) = manifest::check_compatibility(
                cli_version,
                &bundle.version,
                profile.upgrade_command(),
            ) {
                cliclack::log::warning(warning)?;
            }
        }
        None => {
            cliclack::log::warning("Bundle has no scaffold.yaml; skipping version check")?;
        }
    }

    // Step 6: Build the plan and execute it
    let ctx = RunContext {
        target_dir: target_dir.clone(),
        source_root: resolved.root().to_path_buf(),
        options,
        env: EnvOverrides::from_env(),
    };
    let plan = Plan::build(profile, &ctx.options);

    let run_report = scaffold::execute(profile, &ctx, &plan).await?;

    cliclack::log::success(format!(
        "{} operations applied, {} skipped",
        run_report.applied, run_report.skipped
    ))?;
    if !run_report.warnings.is_empty() {
        cliclack::log::warning(format!(
            "{} warning(s); review the output above",
            run_report.warnings.len()
        ))?;
    }

    // Step 7: Summary and next steps
    report::summary(profile, &ctx.options, &ctx.target_dir);
    cliclack::outro("Happy building!")?;

    Ok(())
}

fn check_tools(options: &OptionSet) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");

    match check::check_tools(options) {
        Ok(tools) => {
            let info: Vec<String> = tools.iter().map(|t| t.to_string()).collect();
            spinner.stop(format!("Detected tools: {}", info.join(", ")));
            Ok(())
        }
        Err(err) => {
            spinner.stop("Missing required tools");
            cliclack::log::error(format!("{err}"))?;
            anyhow::bail!("Please install the missing tools and try again.");
        }
    }
}

/// The target is expected to be a freshly generated application tree in
/// (or below) the current directory; scaffolding anything else gets a
/// confirmation prompt.
fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };
    anyhow::ensure!(
        path.is_dir(),
        "target directory does not exist: {}",
        path.display()
    );

    let looks_generated = path.join("Gemfile").is_file() || path.join("config").is_dir();
    if !looks_generated {
        cliclack::log::warning(format!(
            "{} does not look like a generated application",
            path.display()
        ))?;
        let confirm = if args.yes {
            true
        } else {
            cliclack::confirm("Continue anyway?")
                .initial_value(false)
                .interact()?
        };
        if !confirm {
            anyhow::bail!("Setup cancelled.");
        }
    }

    Ok(path)
}
