//! Template source resolution: local directory or remote git repository

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use url::Url;

use crate::cleanup;
use crate::exec::CommandRunner;
use crate::plan::CommandInvocation;

/// Where template assets come from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Local(PathBuf),
    Remote { url: Url, branch: Option<String> },
}

impl TemplateSource {
    /// Classify an identifier: anything parseable as an http(s) URL is a
    /// remote repository; everything else is a local path. A GitHub-style
    /// `/tree/<branch>` suffix selects a branch to check out.
    pub fn parse(identifier: &str) -> Result<Self> {
        if identifier.starts_with("http://") || identifier.starts_with("https://") {
            let raw = Url::parse(identifier)
                .with_context(|| format!("invalid template URL: {identifier}"))?;
            let (url, branch) = split_branch(&raw);
            Ok(TemplateSource::Remote { url, branch })
        } else {
            let path = PathBuf::from(identifier);
            // A file identifier (e.g. a manifest path) resolves to its
            // containing directory.
            let root = if path.is_file() {
                path.parent().map(Path::to_path_buf).unwrap_or(path)
            } else {
                path
            };
            Ok(TemplateSource::Local(root))
        }
    }

    /// Pick the source for a run: an explicit local directory, an
    /// explicit URL, the profile's env override, or its default URL.
    pub fn select(
        template_dir: Option<&Path>,
        template_url: Option<&str>,
        url_env: &str,
        default_url: &str,
    ) -> Result<Self> {
        if let Some(dir) = template_dir {
            return Ok(TemplateSource::Local(dir.to_path_buf()));
        }
        let identifier = template_url
            .map(str::to_string)
            .or_else(|| std::env::var(url_env).ok())
            .unwrap_or_else(|| default_url.to_string());
        TemplateSource::parse(&identifier)
    }
}

/// Split a `/tree/<branch>` suffix off a repository URL.
fn split_branch(url: &Url) -> (Url, Option<String>) {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    if let Some(pos) = segments.iter().position(|s| *s == "tree") {
        if pos >= 1 && pos + 1 < segments.len() {
            let branch = segments[pos + 1..].join("/");
            let mut repo = url.clone();
            repo.set_path(&format!("/{}", segments[..pos].join("/")));
            return (repo, Some(branch));
        }
    }
    (url.clone(), None)
}

/// A resolved, readable bundle root. Remote sources own the temp
/// directory holding the clone; dropping this removes it, and the
/// interrupt-cleanup registry covers Ctrl+C.
#[derive(Debug)]
pub struct ResolvedSource {
    root: PathBuf,
    _tempdir: Option<TempDir>,
}

impl ResolvedSource {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Materialize a source. Clone or checkout failure is fatal — without
/// template assets there is nothing to scaffold.
pub async fn resolve(source: &TemplateSource, runner: &CommandRunner) -> Result<ResolvedSource> {
    match source {
        TemplateSource::Local(path) => {
            anyhow::ensure!(
                path.is_dir(),
                "template directory not found: {}",
                path.display()
            );
            Ok(ResolvedSource {
                root: path.clone(),
                _tempdir: None,
            })
        }
        TemplateSource::Remote { url, branch } => {
            let tempdir = TempDir::with_prefix("vitrail-")
                .context("failed to create temporary directory for template checkout")?;
            cleanup::track(tempdir.path());
            let clone_dir = tempdir.path().to_path_buf();
            let clone_dir_str = clone_dir.display().to_string();

            let clone = CommandInvocation::fatal(&[
                "git",
                "clone",
                "--quiet",
                url.as_str(),
                clone_dir_str.as_str(),
            ]);
            runner
                .run(&clone)
                .await
                .with_context(|| format!("failed to clone template repository {url}"))?;

            if let Some(branch) = branch {
                let checkout = CommandInvocation::fatal(&[
                    "git",
                    "-C",
                    clone_dir_str.as_str(),
                    "checkout",
                    "--quiet",
                    branch.as_str(),
                ]);
                runner
                    .run(&checkout)
                    .await
                    .with_context(|| format!("failed to check out branch {branch}"))?;
            }

            Ok(ResolvedSource {
                root: clone_dir,
                _tempdir: Some(tempdir),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_identifier() {
        let source = TemplateSource::parse("/tmp/some/bundle").unwrap();
        assert!(matches!(source, TemplateSource::Local(p) if p == PathBuf::from("/tmp/some/bundle")));
    }

    #[test]
    fn test_remote_url_without_branch() {
        let source = TemplateSource::parse("https://github.com/acme/vite-template.git").unwrap();
        let TemplateSource::Remote { url, branch } = source else {
            panic!("expected remote source");
        };
        assert_eq!(url.as_str(), "https://github.com/acme/vite-template.git");
        assert_eq!(branch, None);
    }

    #[test]
    fn test_remote_url_with_tree_branch() {
        let source =
            TemplateSource::parse("https://github.com/acme/vite-template/tree/next").unwrap();
        let TemplateSource::Remote { url, branch } = source else {
            panic!("expected remote source");
        };
        assert_eq!(url.as_str(), "https://github.com/acme/vite-template");
        assert_eq!(branch.as_deref(), Some("next"));
    }

    #[test]
    fn test_branch_names_may_contain_slashes() {
        let source =
            TemplateSource::parse("https://github.com/acme/vite-template/tree/feature/yarn-4")
                .unwrap();
        let TemplateSource::Remote { branch, .. } = source else {
            panic!("expected remote source");
        };
        assert_eq!(branch.as_deref(), Some("feature/yarn-4"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(TemplateSource::parse("https://").is_err());
    }

    #[tokio::test]
    async fn test_resolve_local_requires_existing_directory() {
        let runner = CommandRunner::new(".");
        let source = TemplateSource::Local(PathBuf::from("/definitely/not/here"));
        assert!(resolve(&source, &runner).await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_local_uses_directory_directly() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new(".");
        let source = TemplateSource::Local(dir.path().to_path_buf());
        let resolved = resolve(&source, &runner).await.unwrap();
        assert_eq!(resolved.root(), dir.path());
    }

    #[tokio::test]
    async fn test_remote_clone_failure_removes_tempdir() {
        let runner = CommandRunner::new(".");
        let source = TemplateSource::Remote {
            url: Url::parse("https://invalid.invalid/acme/missing.git").unwrap(),
            branch: None,
        };
        // The clone is fatal; the TempDir guard must still clean up.
        let before = std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("vitrail-"))
            .count();
        assert!(resolve(&source, &runner).await.is_err());
        let after = std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("vitrail-"))
            .count();
        assert!(after <= before);
    }
}
