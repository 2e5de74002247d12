//! Synchronizing a fetched subtree into its target directory

use crate::config::SyncConfig;
use crate::system::System;
use crate::utils::fs::{clear_directory, create_parent_directories, directory_exists, ensure_directory};
use anyhow::{Context as _, Result};
use std::path::Path;
use tracing::{debug, error, info};

/// Git's control directory, never copied into a target
const GIT_DIR: &str = ".git";

/// Result of synchronizing one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every entry was copied
    Synced { files: usize },
    /// The configured source directory does not exist in the working clone
    MissingSource,
    /// Clearing the target or copying an entry failed
    Failed,
}

impl SyncOutcome {
    #[must_use]
    #[inline]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Synced { .. })
    }
}

/// Replace the contents of `target_dir` with the contents of `source_dir`
///
/// By default the target is cleared before the source is checked, so a
/// missing source leaves an empty target. With `defer_clear` the check comes
/// first and a missing source leaves the target untouched.
#[inline]
pub fn sync(
    system: &dyn System,
    source_dir: &Path,
    target_dir: &Path,
    options: SyncConfig,
) -> SyncOutcome {
    if options.defer_clear && !directory_exists(system, source_dir) {
        report_missing_source(source_dir);
        return SyncOutcome::MissingSource;
    }

    if let Err(err) = prepare_target(system, target_dir) {
        error!("Failed to prepare {}: {err:#}", target_dir.display());
        return SyncOutcome::Failed;
    }

    if !directory_exists(system, source_dir) {
        report_missing_source(source_dir);
        return SyncOutcome::MissingSource;
    }

    match copy_entries(system, source_dir, target_dir) {
        Ok(files) => {
            info!(
                "Synced {} -> {} ({files} files)",
                source_dir.display(),
                target_dir.display()
            );
            SyncOutcome::Synced { files }
        }
        Err(err) => {
            error!(
                "Failed to sync {} -> {}: {err:#}",
                source_dir.display(),
                target_dir.display()
            );
            SyncOutcome::Failed
        }
    }
}

fn report_missing_source(source_dir: &Path) {
    error!(
        "Configuration error: source directory {} was not found in the fetched repository",
        source_dir.display()
    );
}

fn prepare_target(system: &dyn System, target_dir: &Path) -> Result<()> {
    ensure_directory(system, target_dir)?;
    clear_directory(system, target_dir)?;
    debug!("Cleared {}", target_dir.display());
    Ok(())
}

/// Copy the immediate entries of `source_dir`, stopping at the first failure
fn copy_entries(system: &dyn System, source_dir: &Path, target_dir: &Path) -> Result<usize> {
    let entries = system
        .read_dir(source_dir)
        .with_context(|| format!("Failed to read directory: {}", source_dir.display()))?;

    let mut files_copied = 0;

    for entry in entries {
        let Some(name) = entry.file_name() else {
            continue;
        };
        if name == GIT_DIR {
            continue;
        }

        let destination = target_dir.join(name);
        if system.is_dir(&entry) {
            files_copied += copy_directory(system, &entry, &destination)?;
        } else {
            copy_file(system, &entry, &destination)?;
            files_copied += 1;
        }
    }

    Ok(files_copied)
}

/// Copy a single file byte for byte
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the copy fails
#[inline]
pub fn copy_file(system: &dyn System, source: &Path, target: &Path) -> Result<()> {
    create_parent_directories(system, target)?;
    system.copy(source, target).with_context(|| {
        format!(
            "Failed to copy file from {} to {}",
            source.display(),
            target.display()
        )
    })?;
    Ok(())
}

/// Copy a directory recursively, returning the number of files copied
///
/// # Errors
///
/// Returns an error if the source cannot be walked or any entry cannot be copied
#[inline]
pub fn copy_directory(system: &dyn System, source: &Path, target: &Path) -> Result<usize> {
    ensure_directory(system, target)?;

    let mut files_copied = 0;

    for entry in system
        .walk_dir(source)
        .with_context(|| format!("Failed to walk directory: {}", source.display()))?
    {
        let relative_path = entry
            .path
            .strip_prefix(source)
            .context("Failed to calculate relative path")?;
        let target_path = target.join(relative_path);

        if entry.is_dir {
            ensure_directory(system, &target_path)?;
        } else if entry.is_file {
            copy_file(system, &entry.path, &target_path)?;
            files_copied += 1;
        }
    }

    Ok(files_copied)
}
