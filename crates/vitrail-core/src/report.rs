//! End-of-run summary output

use std::path::Path;

use colored::Colorize;

use crate::options::OptionSet;
use crate::profile::ScaffoldProfile;

/// The status lines the activated flags produce, in input order.
/// Observational only; duplicated flags report twice, matching their
/// execution.
pub fn summary_lines<P: ScaffoldProfile>(profile: &P, options: &OptionSet) -> Vec<&'static str> {
    options
        .flags()
        .iter()
        .filter_map(|flag| profile.summary_line(*flag))
        .collect()
}

/// Print one status line per activated flag, then the fixed next-steps
/// guidance.
pub fn summary<P: ScaffoldProfile>(profile: &P, options: &OptionSet, target_dir: &Path) {
    println!();
    for line in summary_lines(profile, options) {
        println!("{}", line.green());
    }

    println!();
    println!("{}", "  To get started with your new app:".yellow());
    for line in profile.next_steps(target_dir) {
        println!("  {line}");
    }
    println!();
}
