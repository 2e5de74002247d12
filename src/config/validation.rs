//! Configuration validation logic

use crate::config::{Config, RepositorySpec};
use crate::error::DocSyncError;
use crate::utils::path::{normalize_path, normalize_separators, validate_path_safety};
use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Validate a complete configuration
///
/// # Errors
///
/// Returns an error if:
/// - The configuration does not contain at least one repository
/// - The remote base is empty
/// - A repository entry is invalid
/// - Two repositories map to the same target directory
#[inline]
pub fn validate_config(config: &Config) -> Result<()> {
    if config.repositories.is_empty() {
        return Err(DocSyncError::configuration(
            "Configuration must contain at least one repository",
        )
        .into());
    }

    if config.remote_base.trim().is_empty() {
        return Err(DocSyncError::configuration("remoteBase cannot be empty").into());
    }

    // Neither segment may start with a dot, which rules out `.`, `..` and `.git`
    let identifier = Regex::new(r"^[\w-][\w.-]*/[\w-][\w.-]*$")?;
    for (index, spec) in config.repositories.iter().enumerate() {
        validate_repository_spec(&identifier, spec, index)?;
    }

    validate_unique_targets(&config.repositories)
}

/// Validate a single repository entry
fn validate_repository_spec(identifier: &Regex, spec: &RepositorySpec, index: usize) -> Result<()> {
    let context = format!("Repository #{} ({})", index + 1, spec.repo);

    if !identifier.is_match(&spec.repo) {
        return Err(DocSyncError::configuration(format!(
            "{context}: Invalid repository identifier '{}'. Expected format: 'owner/name'",
            spec.repo
        ))
        .into());
    }

    // The short name becomes the working clone directory under the work root
    let name = spec.short_name();
    if name.is_empty() || spec.repo.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(DocSyncError::configuration(format!(
            "{context}: Repository identifier '{}' does not name a directory",
            spec.repo
        ))
        .into());
    }

    if spec.target.trim().is_empty() {
        return Err(
            DocSyncError::configuration(format!("{context}: Target path cannot be empty")).into(),
        );
    }

    if spec.branch.trim().is_empty() {
        return Err(
            DocSyncError::configuration(format!("{context}: Branch cannot be empty")).into(),
        );
    }

    validate_path_safety(&spec.target).map_err(|e| {
        DocSyncError::configuration(format!("{context}: target: {}", root_message(&e)))
    })?;

    if !spec.is_whole_repository() {
        validate_path_safety(&spec.source).map_err(|e| {
            DocSyncError::configuration(format!("{context}: source: {}", root_message(&e)))
        })?;
    }

    Ok(())
}

/// Reject two entries writing into the same target directory
fn validate_unique_targets(repositories: &[RepositorySpec]) -> Result<()> {
    let mut seen: HashMap<PathBuf, usize> = HashMap::new();

    for (index, spec) in repositories.iter().enumerate() {
        let normalized = normalize_path(Path::new(&normalize_separators(&spec.target)));
        if let Some(first) = seen.insert(normalized, index) {
            return Err(DocSyncError::configuration(format!(
                "Repositories #{} and #{} both use target '{}'",
                first + 1,
                index + 1,
                spec.target
            ))
            .into());
        }
    }

    Ok(())
}

fn root_message(err: &anyhow::Error) -> String {
    err.downcast_ref::<DocSyncError>().map_or_else(
        || err.to_string(),
        |inner| match inner {
            DocSyncError::Configuration { message } => message.clone(),
            other => other.to_string(),
        },
    )
}
