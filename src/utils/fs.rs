//! File system utilities

use crate::error::DocSyncError;
use crate::system::System;
use anyhow::{Context as _, Result};
use std::io;
use std::path::Path;

/// True only if `path` exists and is a directory
///
/// Any stat failure, including not-found, reads as `false`.
#[must_use]
#[inline]
pub fn directory_exists(system: &dyn System, path: &Path) -> bool {
    system.is_dir(path)
}

/// Ensure a directory exists, creating the full chain if necessary
///
/// # Errors
///
/// Returns an error if:
/// - The path exists but is not a directory
/// - The directory cannot be created
#[inline]
pub fn ensure_directory(system: &dyn System, dir_path: &Path) -> Result<()> {
    if system.is_dir(dir_path) {
        return Ok(());
    }
    if system.exists(dir_path) {
        return Err(DocSyncError::filesystem(format!(
            "Path exists but is not a directory: {}",
            dir_path.display()
        ))
        .into());
    }
    system
        .create_dir_all(dir_path)
        .with_context(|| format!("Failed to create directory: {}", dir_path.display()))
}

/// Remove every entry inside `dir_path` while keeping the directory itself
///
/// A missing directory has nothing to clear and is not an error.
///
/// # Errors
///
/// Returns an error if an entry cannot be listed or removed
#[inline]
pub fn clear_directory(system: &dyn System, dir_path: &Path) -> Result<()> {
    let entries = match system.read_dir(dir_path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read directory: {}", dir_path.display()));
        }
    };

    for entry in entries {
        if system.is_dir(&entry) {
            system
                .remove_dir_all(&entry)
                .with_context(|| format!("Failed to remove directory: {}", entry.display()))?;
        } else {
            system
                .remove_file(&entry)
                .with_context(|| format!("Failed to remove file: {}", entry.display()))?;
        }
    }

    Ok(())
}

/// Safely remove directory and all its contents
///
/// # Errors
///
/// Returns an error if an existing directory cannot be removed
#[inline]
pub fn remove_dir_safe(system: &dyn System, dir_path: &Path) -> Result<()> {
    if system.is_dir(dir_path) {
        system
            .remove_dir_all(dir_path)
            .with_context(|| format!("Failed to remove directory: {}", dir_path.display()))?;
    }
    Ok(())
}

/// Create parent directories for a file path if they don't exist
///
/// # Errors
///
/// Returns an error if the parent directories cannot be created
#[inline]
pub fn create_parent_directories(system: &dyn System, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent()
        && !system.exists(parent)
    {
        system.create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create parent directories for: {}",
                file_path.display()
            )
        })?;
    }
    Ok(())
}

/// Check if directory is empty
///
/// # Errors
///
/// Returns an error if the directory cannot be read
#[inline]
pub fn is_directory_empty(system: &dyn System, dir_path: &Path) -> Result<bool> {
    if !system.is_dir(dir_path) {
        return Ok(false);
    }

    let entries = system
        .read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.display()))?;

    Ok(entries.is_empty())
}
