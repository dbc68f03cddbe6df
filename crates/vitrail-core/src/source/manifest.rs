//! Bundle manifest parsing and version compatibility

use std::path::Path;

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "scaffold.yaml";

/// Metadata at the root of a template bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Display name of the bundle
    pub name: String,

    /// What the bundle provides
    #[serde(default)]
    pub description: String,

    /// Minimum CLI version the bundle expects
    pub version: String,
}

/// Load the bundle manifest if the bundle ships one. Unversioned bundles
/// stay usable; a manifest that exists but does not parse is an error.
pub fn load(root: &Path) -> Result<Option<BundleManifest>> {
    let path = root.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(manifest))
}

/// Compare the CLI version against what the bundle expects. Returns a
/// warning message when the CLI is older; unparseable versions skip the
/// check.
pub fn check_compatibility(
    cli_version: &str,
    bundle_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli = Version::parse(cli_version).ok()?;
    let bundle = Version::parse(bundle_version).ok()?;

    if cli < bundle {
        Some(format!(
            "This bundle expects CLI version {} or newer; you are running {}. \
             Consider updating: {}",
            bundle_version, cli_version, upgrade_command
        ))
    } else {
        None
    }
}
