//! Execution of plan file operations with per-operation overwrite policy

use std::path::{Path, PathBuf};

use tokio::fs;
use walkdir::WalkDir;

use super::{inject, InjectResult, OpError, OpOutcome, SkipReason};
use crate::plan::{FileOperation, Position};

/// Applies `FileOperation`s, resolving operation sources against the
/// bundle root and destinations against the target tree. The engine is
/// the single writer against the target; execution is strictly
/// sequential.
pub struct FileOpEngine {
    source_root: PathBuf,
    target_root: PathBuf,
}

impl FileOpEngine {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        FileOpEngine {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub async fn apply(&self, op: &FileOperation) -> Result<OpOutcome, OpError> {
        match op {
            FileOperation::Copy {
                src,
                dest,
                overwrite,
            } => self.copy_file(src, dest, *overwrite).await,
            FileOperation::MergeDirectory {
                src,
                dest,
                overwrite,
            } => self.merge_directory(src, dest, *overwrite).await,
            FileOperation::InjectText {
                target,
                anchor,
                payload,
                position,
            } => self.inject_text(target, anchor, payload, *position).await,
            FileOperation::RenameByExtension {
                dir,
                from_ext,
                to_ext,
            } => self.rename_by_extension(dir, from_ext, to_ext).await,
        }
    }

    async fn copy_file(
        &self,
        src: &Path,
        dest: &Path,
        overwrite: bool,
    ) -> Result<OpOutcome, OpError> {
        let src_abs = self.source_root.join(src);
        if !src_abs.is_file() {
            return Err(OpError::MissingSource(src_abs));
        }
        let dest_abs = self.target_root.join(dest);
        if dest_abs.exists() && !overwrite {
            return Ok(OpOutcome::Skipped(SkipReason::DestinationExists));
        }
        if let Some(parent) = dest_abs.parent() {
            fs::create_dir_all(parent).await.map_err(|source| OpError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&src_abs, &dest_abs).await.map_err(|source| OpError::Io {
            path: dest_abs.clone(),
            source,
        })?;
        Ok(OpOutcome::Applied)
    }

    async fn merge_directory(
        &self,
        src: &Path,
        dest: &Path,
        overwrite: bool,
    ) -> Result<OpOutcome, OpError> {
        let src_abs = self.source_root.join(src);
        if !src_abs.is_dir() {
            return Err(OpError::MissingSource(src_abs));
        }
        let dest_abs = self.target_root.join(dest);

        for entry in WalkDir::new(&src_abs) {
            let entry = entry.map_err(|e| OpError::Io {
                path: src_abs.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&src_abs) else {
                continue;
            };
            let file_dest = dest_abs.join(relative);
            if file_dest.exists() && !overwrite {
                continue;
            }
            if let Some(parent) = file_dest.parent() {
                fs::create_dir_all(parent).await.map_err(|source| OpError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::copy(entry.path(), &file_dest)
                .await
                .map_err(|source| OpError::Io {
                    path: file_dest.clone(),
                    source,
                })?;
        }
        Ok(OpOutcome::Applied)
    }

    async fn inject_text(
        &self,
        target: &Path,
        anchor: &str,
        payload: &str,
        position: Position,
    ) -> Result<OpOutcome, OpError> {
        let path = self.target_root.join(target);
        if !path.is_file() {
            return Ok(OpOutcome::Skipped(SkipReason::TargetMissing));
        }
        let bytes = fs::read(&path).await.map_err(|source| OpError::Io {
            path: path.clone(),
            source,
        })?;
        let contents = String::from_utf8(bytes)
            .map_err(|_| OpError::NonUtf8Target { path: path.clone() })?;

        match inject::inject(&contents, anchor, payload, position) {
            InjectResult::Injected(updated) => {
                fs::write(&path, updated).await.map_err(|source| OpError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(OpOutcome::Applied)
            }
            InjectResult::AnchorMissing => Ok(OpOutcome::Skipped(SkipReason::AnchorMissing)),
            InjectResult::PayloadPresent => Ok(OpOutcome::Skipped(SkipReason::PayloadPresent)),
        }
    }

    async fn rename_by_extension(
        &self,
        dir: &Path,
        from_ext: &str,
        to_ext: &str,
    ) -> Result<OpOutcome, OpError> {
        let root = self.target_root.join(dir);
        if !root.is_dir() {
            return Ok(OpOutcome::Skipped(SkipReason::TargetMissing));
        }

        let mut renames = Vec::new();
        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| OpError::Io {
                path: root.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) == Some(from_ext) {
                renames.push(entry.path().to_path_buf());
            }
        }

        for path in renames {
            let renamed = path.with_extension(to_ext);
            fs::rename(&path, &renamed).await.map_err(|source| OpError::Io {
                path: path.clone(),
                source,
            })?;
        }
        Ok(OpOutcome::Applied)
    }
}
