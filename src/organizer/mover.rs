use crate::error::{OrganizeError, OrganizeResult};
use crate::organizer::preview::OrganizePlan;
use crate::utils;
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file that was (or in a dry run, would be) moved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Destination name changed to avoid overwriting an existing file
    pub renamed: bool,
}

/// A move that failed; the rest of the run continued
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMove {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    pub moved: Vec<MovedFile>,
    pub failed: Vec<FailedMove>,
}

/// Handles safe file reorganization with dry-run support
pub struct FileMover {
    base_path: PathBuf,
}

impl FileMover {
    /// Create a new FileMover for the given base directory
    pub fn new<P: AsRef<Path>>(base_path: P) -> OrganizeResult<Self> {
        let raw = base_path.as_ref();
        let base_path = raw.canonicalize().map_err(|e| OrganizeError::TargetPath {
            path: raw.to_path_buf(),
            reason: format!("does not exist ({})", e),
        })?;

        if !base_path.is_dir() {
            return Err(OrganizeError::TargetPath {
                path: base_path,
                reason: "is not a directory".to_string(),
            });
        }

        Ok(Self { base_path })
    }

    /// Check that every operation stays within the base path
    pub fn validate(&self, plan: &OrganizePlan) -> anyhow::Result<()> {
        for dir_op in &plan.directories_to_create {
            if !dir_op.path.starts_with(&self.base_path) {
                anyhow::bail!(
                    "Directory creation outside base path: {}",
                    dir_op.path.display()
                );
            }
        }

        for move_op in &plan.files_to_move {
            if !move_op.source.starts_with(&self.base_path) {
                anyhow::bail!("Source file outside base path: {}", move_op.source.display());
            }
            if !move_op.destination.starts_with(&self.base_path) {
                anyhow::bail!(
                    "Destination outside base path: {}",
                    move_op.destination.display()
                );
            }
        }

        Ok(())
    }

    /// Execute the plan. Each move is independent: failures are recorded and
    /// the remaining files are still processed. Existing files are never overwritten.
    pub fn execute(&self, plan: &OrganizePlan, dry_run: bool) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();

        if dry_run {
            info!("dry run, no files will be moved");
            for move_op in &plan.files_to_move {
                let destination = utils::unique_destination(&move_op.destination, occupied);
                outcome.moved.push(MovedFile {
                    renamed: destination != move_op.destination,
                    source: move_op.source.clone(),
                    destination,
                });
            }
            return outcome;
        }

        // Create directories first
        for dir_op in &plan.directories_to_create {
            match fs::create_dir_all(&dir_op.path) {
                Ok(()) => debug!(path = %dir_op.path.display(), "directory ready"),
                // moves into it will fail and be reported individually
                Err(e) => warn!(path = %dir_op.path.display(), error = %e, "failed to create directory"),
            }
        }

        for move_op in &plan.files_to_move {
            match self.move_one(&move_op.source, &move_op.destination) {
                Ok(destination) => {
                    let renamed = destination != move_op.destination;
                    if renamed {
                        info!(
                            from = %move_op.source.display(),
                            to = %destination.display(),
                            "destination taken, renamed"
                        );
                    } else {
                        debug!(from = %move_op.source.display(), to = %destination.display(), "moved");
                    }
                    outcome.moved.push(MovedFile {
                        source: move_op.source.clone(),
                        destination,
                        renamed,
                    });
                }
                Err(e) => {
                    warn!(path = %move_op.source.display(), error = %e, "move failed");
                    outcome.failed.push(FailedMove {
                        path: move_op.source.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        outcome
    }

    fn move_one(&self, source: &Path, destination: &Path) -> anyhow::Result<PathBuf> {
        if !source.is_file() {
            anyhow::bail!("source file no longer exists");
        }

        // Ensure destination directory exists
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create destination directory: {}", parent.display())
            })?;
        }

        let destination = utils::unique_destination(destination, occupied);
        fs::rename(source, &destination).with_context(|| {
            format!(
                "Failed to move {} to {}",
                source.display(),
                destination.display()
            )
        })?;

        Ok(destination)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

// Dangling symlinks count as taken too
fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
