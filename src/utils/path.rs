//! Path manipulation and validation utilities

use crate::error::DocSyncError;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading '..' components, otherwise pop
                if components
                    .last()
                    .is_none_or(|last| matches!(last, Component::ParentDir))
                {
                    components.push(component);
                } else {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Validate that a configured relative path stays inside its root
///
/// # Errors
///
/// Returns an error if:
/// - The path is absolute
/// - The path escapes its root through `..`
pub fn validate_path_safety(path: &str) -> Result<()> {
    let path_obj = Path::new(path);

    if path_obj.is_absolute() || path.starts_with('/') {
        return Err(DocSyncError::configuration(format!(
            "Absolute paths are not allowed: '{path}'. Use relative paths instead."
        ))
        .into());
    }

    if path_obj
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        let normalized = normalize_path(path_obj);
        return Err(DocSyncError::configuration(format!(
            "Path contains unsafe directory traversal: '{path}' -> '{}'",
            normalized.display()
        ))
        .into());
    }

    Ok(())
}

/// Last path segment of a repository identifier (`owner/name` -> `name`)
#[must_use]
pub fn short_name(repo_identifier: &str) -> &str {
    let trimmed = repo_identifier.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Convert backslashes to forward slashes
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Canonical form of a repository subdirectory
///
/// Separators become `/`, leading `./` and surrounding slashes are dropped,
/// and the whole-repository forms `""` and `"."` both become `""`.
#[must_use]
pub fn normalize_source(source: &str) -> String {
    let normalized = normalize_separators(source.trim());
    let trimmed = normalized.trim_start_matches("./").trim_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_owned()
    }
}

/// `root/name`, provided `name` is a single plain path segment
///
/// # Errors
///
/// Returns an error if `name` is empty, `.`, `..`, absolute or contains a
/// separator, since the result would not be a strict child of `root`
pub fn child_path(root: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) if !name.contains('\\') => {
            Ok(root.join(segment))
        }
        _ => Err(DocSyncError::filesystem(format!(
            "'{name}' is not a plain directory name below {}",
            root.display()
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_validate_path_safety() {
        assert!(validate_path_safety("api").is_ok());
        assert!(validate_path_safety("guides/intro").is_ok());
        assert!(validate_path_safety("./guides").is_ok());

        assert!(validate_path_safety("/etc").is_err());
        assert!(validate_path_safety("../outside").is_err());
        assert!(validate_path_safety("a/../../outside").is_err());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("acme/handbook"), "handbook");
        assert_eq!(short_name("acme/handbook.git"), "handbook");
        assert_eq!(short_name("handbook"), "handbook");
        assert_eq!(short_name("acme/handbook/"), "handbook");
    }

    #[test]
    fn test_normalize_source() {
        assert_eq!(normalize_source(""), "");
        assert_eq!(normalize_source(" . "), "");
        assert_eq!(normalize_source("./docs/api/"), "docs/api");
        assert_eq!(normalize_source(r"docs\api"), "docs/api");
    }

    #[test]
    fn test_child_path() {
        let root = Path::new("/work");
        assert_eq!(child_path(root, "handbook").unwrap(), PathBuf::from("/work/handbook"));

        for name in ["", ".", "..", "a/b", "/etc", r"..\x"] {
            assert!(child_path(root, name).is_err(), "{name:?} accepted");
        }
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators(r"docs\api"), "docs/api");
    }
}
