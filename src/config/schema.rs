//! JSON Schema validation for docsync configuration

use crate::error::DocSyncError;
use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

const SCHEMA: &str = include_str!("docsync.schema.json");

/// Compile the embedded JSON schema for docsync configuration
///
/// # Errors
///
/// Returns an error if the embedded schema is not valid JSON or not a valid draft 7 schema
pub fn get_schema() -> Result<Validator> {
    let schema: Value = serde_json::from_str(SCHEMA)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {e}"))?;

    jsonschema::draft7::new(&schema).map_err(|e| anyhow!("Failed to compile JSON schema: {e}"))
}

/// Validate a configuration value against the schema
///
/// # Errors
///
/// Returns a configuration error listing every violation
pub fn validate_against_schema(config: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(config)
        .map(|e| format!("  - Path '{}': {}", e.instance_path, e))
        .collect();

    if !error_messages.is_empty() {
        return Err(DocSyncError::configuration(format!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n")
        ))
        .into());
    }

    Ok(())
}
