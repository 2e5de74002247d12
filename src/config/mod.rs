//! Configuration management module
//!
//! Handles YAML configuration parsing, JSON schema validation and semantic checks

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::system::System;
use crate::utils::path::{normalize_source, short_name};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default remote hosting convention: `https://github.com/<owner>/<name>.git`
pub const DEFAULT_REMOTE_BASE: &str = "https://github.com";

/// Default number of retries after the first fetch attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default fixed delay between fetch attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 3_000;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory receiving one subdirectory per repository target
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,

    /// Root of the temporary working clones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    /// Base URL that repository identifiers are appended to
    #[serde(default = "default_remote_base")]
    pub remote_base: String,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    /// Repositories to aggregate, processed in declaration order
    pub repositories: Vec<RepositorySpec>,
}

/// One repository subtree mapped onto one target directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySpec {
    /// `owner/name` identifier
    pub repo: String,
    /// Directory relative to the docs root
    pub target: String,
    /// Subdirectory inside the repository; `""` or `"."` for the whole tree
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

/// Bounded retry policy for fetching a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Retries beyond the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed wait before every retry, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Sync engine behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Only clear a target once the source subtree is known to exist
    #[serde(default)]
    pub defer_clear: bool,
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("docs")
}

fn default_remote_base() -> String {
    DEFAULT_REMOTE_BASE.to_owned()
}

fn default_branch() -> String {
    "main".to_owned()
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

const fn default_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

impl Default for RetryConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Total number of attempts, counting the first one
    #[must_use]
    #[inline]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    #[must_use]
    #[inline]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl RepositorySpec {
    /// Create an entry with every field given explicitly
    #[must_use]
    #[inline]
    pub fn new(repo: &str, target: &str, source: &str, branch: &str) -> Self {
        Self {
            repo: repo.to_owned(),
            target: target.to_owned(),
            source: source.to_owned(),
            branch: branch.to_owned(),
        }
    }

    /// Name of the working clone directory shared by specs of the same repository
    #[must_use]
    #[inline]
    pub fn short_name(&self) -> &str {
        short_name(&self.repo)
    }

    /// Repository subdirectory with `/` separators, `""` for the whole tree
    #[must_use]
    #[inline]
    pub fn source_path(&self) -> String {
        normalize_source(&self.source)
    }

    /// Whether the whole repository, rather than a subdirectory, is requested
    #[must_use]
    #[inline]
    pub fn is_whole_repository(&self) -> bool {
        self.source_path().is_empty()
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the repository list
    #[must_use]
    #[inline]
    pub fn new(docs_root: PathBuf, repositories: Vec<RepositorySpec>) -> Self {
        Self {
            docs_root,
            work_dir: None,
            remote_base: default_remote_base(),
            retry: RetryConfig::default(),
            sync: SyncConfig::default(),
            repositories,
        }
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed or invalid
    #[inline]
    pub fn load_from_file(system: &dyn System, path: &str) -> anyhow::Result<Self> {
        yaml::load_config(system, path)
    }

    /// Validate the semantic rules the schema cannot express
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated rule
    #[inline]
    pub fn validate(&self) -> anyhow::Result<()> {
        validation::validate_config(self)
    }

    /// Resolved root of the working clones
    #[must_use]
    #[inline]
    pub fn work_root(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(default_work_root)
    }

    /// Remote URL for a repository identifier
    #[must_use]
    #[inline]
    pub fn repository_url(&self, spec: &RepositorySpec) -> String {
        let base = self.remote_base.trim_end_matches('/');
        let repo = spec.repo.trim_matches('/');
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        format!("{base}/{repo}.git")
    }
}

/// `<user cache dir>/docsync`, or the system temp directory when there is none
#[must_use]
pub fn default_work_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("docsync")
}
