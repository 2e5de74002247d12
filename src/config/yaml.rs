//! YAML configuration loading and parsing

use crate::config::Config;
use crate::error::DocSyncError;
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::Path;

/// Load and parse YAML configuration from file
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist or cannot be read
/// - The YAML cannot be parsed
/// - The configuration violates the schema or the semantic rules
pub fn load_config(system: &dyn System, path: &str) -> Result<Config> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj) {
        return Err(DocSyncError::configuration(format!(
            "Configuration file not found: {path}\n\
            Create a docsync.yaml file or specify a different path with --config"
        ))
        .into());
    }

    let content = system
        .read_to_string(path_obj)
        .with_context(|| format!("Failed to read configuration file: {path}"))?;

    parse_config(&content).with_context(|| format!("Invalid configuration file: {path}"))
}

/// Parse and validate configuration text
///
/// # Errors
///
/// Returns an error if the text is not valid YAML, violates the schema or
/// fails semantic validation
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        DocSyncError::configuration(format!(
            "Failed to parse YAML configuration: {e}\n\
            Please check the syntax and structure of your configuration file"
        ))
    })?;

    // Validate the document as written, before serde fills in defaults
    let raw_json = serde_json::to_value(&raw)
        .context("Failed to convert configuration to JSON for validation")?;
    crate::config::schema::validate_against_schema(&raw_json)?;

    let config: Config = serde_yaml::from_value(raw).map_err(|e| {
        DocSyncError::configuration(format!("Failed to parse YAML configuration: {e}"))
    })?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;
    use std::path::PathBuf;

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let config = parse_config(
            r"
repositories:
  - repo: acme/handbook
    target: handbook
",
        )
        .unwrap();

        assert_eq!(config.docs_root, PathBuf::from("docs"));
        assert_eq!(config.remote_base, "https://github.com");
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.delay_ms, 3000);
        assert!(!config.sync.defer_clear);

        let spec = &config.repositories[0];
        assert_eq!(spec.source, "");
        assert_eq!(spec.branch, "main");
    }

    #[test]
    fn test_load_missing_file() {
        let system = MockSystem::new();
        let err = load_config(&system, "/nope/docsync.yaml").unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_load_from_mock_file() {
        let system = MockSystem::new()
            .with_file(
                "/project/docsync.yaml",
                br"
docsRoot: site/content
workDir: /tmp/docsync
retry:
  maxRetries: 1
  delayMs: 10
sync:
  deferClear: true
repositories:
  - repo: acme/api
    target: api
    source: docs/api
    branch: release
",
            )
            .unwrap();

        let config = load_config(&system, "/project/docsync.yaml").unwrap();
        assert_eq!(config.docs_root, PathBuf::from("site/content"));
        assert_eq!(config.work_dir, Some(PathBuf::from("/tmp/docsync")));
        assert_eq!(config.retry.max_attempts(), 2);
        assert!(config.sync.defer_clear);
        assert_eq!(config.repositories[0].branch, "release");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_config("repositories: [\n").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse YAML"));
    }
}
