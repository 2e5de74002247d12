//! Git sparse checkout with bounded retries
//!
//! A working clone is either created from scratch (shallow, no checkout,
//! non-cone sparse patterns, then checkout) or, when it already exists,
//! updated in place with fetch + checkout + pull. Any failure restarts from a
//! clean directory after a fixed delay until the attempt budget is spent.

use crate::config::RetryConfig;
use crate::error::DocSyncError;
use crate::system::System;
use crate::utils::fs::{create_parent_directories, directory_exists, remove_dir_safe};
use crate::utils::path::normalize_source;
use crate::utils::shell::{ShellOutput, execute};
use anyhow::{Context as _, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Relative location of the sparse-checkout pattern file inside a clone
pub const SPARSE_CHECKOUT_FILE: &str = ".git/info/sparse-checkout";

/// Sparse-checkout pattern selecting `source` and everything below it
///
/// An empty source or `.` selects the whole repository.
#[must_use]
#[inline]
pub fn sparse_pattern(source: &str) -> String {
    let source = normalize_source(source);
    if source.is_empty() {
        "*".to_owned()
    } else {
        format!("{source}/**/*")
    }
}

/// What to fetch and where to put it
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Remote URL, e.g. `https://github.com/acme/handbook.git`
    pub url: String,
    pub branch: String,
    /// Subdirectory selected by the sparse pattern
    pub source: String,
    /// Working clone directory
    pub clone_dir: PathBuf,
}

/// Result of fetching one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome {
    pub success: bool,
    /// Attempts made, counting the first one
    pub attempts: u32,
}

/// Drives clone-or-update of a single working clone with retries
#[non_exhaustive]
pub struct SparseCheckout<'src> {
    system: &'src dyn System,
    retry: RetryConfig,
}

impl<'src> SparseCheckout<'src> {
    /// Create a controller using the given retry policy
    #[must_use]
    #[inline]
    pub const fn new(system: &'src dyn System, retry: RetryConfig) -> Self {
        Self { system, retry }
    }

    /// Bring `request.clone_dir` to the tip of `request.branch`
    ///
    /// Never returns an error; failures are logged and reported through
    /// [`FetchOutcome::success`].
    #[inline]
    pub fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        let max_attempts = self.retry.max_attempts();

        for attempt in 0..max_attempts {
            let attempt_number = attempt + 1;

            if attempt > 0 {
                // A previous attempt may have left a half-written clone behind
                if let Err(err) = remove_dir_safe(self.system, &request.clone_dir) {
                    warn!(
                        "Could not reset working clone {}: {err:#}",
                        request.clone_dir.display()
                    );
                }
                warn!(
                    "Retrying {} in {}ms (attempt {attempt_number}/{max_attempts})",
                    request.url, self.retry.delay_ms
                );
                self.system.sleep(self.retry.delay());
            }

            match self.attempt(request) {
                Ok(()) => {
                    debug!("Fetched {} on attempt {attempt_number}", request.url);
                    return FetchOutcome {
                        success: true,
                        attempts: attempt_number,
                    };
                }
                Err(err) => {
                    error!(
                        "Attempt {attempt_number}/{max_attempts} to fetch {} failed: {err:#}",
                        request.url
                    );
                }
            }
        }

        error!(
            "Giving up on {} after {max_attempts} attempts",
            request.url
        );
        FetchOutcome {
            success: false,
            attempts: max_attempts,
        }
    }

    fn attempt(&self, request: &FetchRequest) -> Result<()> {
        if directory_exists(self.system, &request.clone_dir) {
            info!(
                "Updating existing working clone {}",
                request.clone_dir.display()
            );
            self.update(request)
        } else {
            info!("Cloning {} ({})", request.url, request.branch);
            self.clone_fresh(request)
        }
    }

    /// NotCloned -> Cloning -> SparseConfigured -> CheckedOut
    fn clone_fresh(&self, request: &FetchRequest) -> Result<()> {
        let clone_dir = request
            .clone_dir
            .to_str()
            .ok_or_else(|| anyhow!("Working clone path is not valid UTF-8"))?;

        let clone = self.git(
            &[
                "clone",
                "--depth",
                "1",
                "--branch",
                &request.branch,
                "--no-checkout",
                &request.url,
                clone_dir,
            ],
            None,
        );

        if !directory_exists(self.system, &request.clone_dir) {
            return Err(DocSyncError::git(format!(
                "Clone of '{}' did not create {}",
                request.url, clone_dir
            ))
            .into());
        }
        require(&clone, "clone")?;
        debug!("Repository cloned");

        self.configure_sparse_checkout(request)?;
        debug!("Sparse checkout configured");

        require(
            &self.git(&["checkout", &request.branch], Some(&request.clone_dir)),
            "checkout",
        )?;
        debug!("Branch {} checked out", request.branch);

        Ok(())
    }

    /// Cloned -> Fetching -> CheckedOut
    ///
    /// A clone whose `origin` is some other repository with the same short
    /// name fails the attempt, so the retry starts over from a fresh clone.
    /// Sparse patterns are not rewritten, only widened when another entry
    /// sharing this clone asks for a subdirectory that is not selected yet.
    fn update(&self, request: &FetchRequest) -> Result<()> {
        let dir = Some(request.clone_dir.as_path());

        let origin = self.git(&["remote", "get-url", "origin"], dir);
        require(&origin, "remote get-url")?;
        if origin.text() != request.url {
            return Err(DocSyncError::git(format!(
                "Working clone {} tracks '{}', not '{}'",
                request.clone_dir.display(),
                origin.text(),
                request.url
            ))
            .into());
        }

        require(&self.git(&["fetch", "origin", &request.branch], dir), "fetch")?;
        require(&self.git(&["checkout", &request.branch], dir), "checkout")?;
        require(
            &self.git(&["pull", "--ff-only", "origin", &request.branch], dir),
            "pull",
        )?;

        if self.widen_sparse_patterns(request)? {
            require(
                &self.git(&["sparse-checkout", "reapply"], dir),
                "sparse-checkout reapply",
            )?;
        }

        Ok(())
    }

    /// Append the request's pattern to an existing pattern file if missing
    ///
    /// Returns whether the file changed.
    fn widen_sparse_patterns(&self, request: &FetchRequest) -> Result<bool> {
        let pattern_file = request.clone_dir.join(SPARSE_CHECKOUT_FILE);
        let Ok(current) = self.system.read_to_string(&pattern_file) else {
            debug!("No sparse-checkout patterns in {}", request.clone_dir.display());
            return Ok(false);
        };

        let pattern = sparse_pattern(&request.source);
        if current
            .lines()
            .map(str::trim)
            .any(|line| line == "*" || line == pattern)
        {
            return Ok(false);
        }

        let mut updated = current;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&pattern);
        updated.push('\n');

        info!("Adding sparse-checkout pattern '{pattern}'");
        self.system
            .write(&pattern_file, updated.as_bytes())
            .with_context(|| {
                format!(
                    "Failed to write sparse-checkout patterns: {}",
                    pattern_file.display()
                )
            })?;

        Ok(true)
    }

    fn configure_sparse_checkout(&self, request: &FetchRequest) -> Result<()> {
        require(
            &self.git(
                &["sparse-checkout", "init", "--no-cone"],
                Some(&request.clone_dir),
            ),
            "sparse-checkout init",
        )?;

        let pattern = sparse_pattern(&request.source);
        let pattern_file = request.clone_dir.join(SPARSE_CHECKOUT_FILE);
        debug!("Writing sparse-checkout pattern '{pattern}'");

        create_parent_directories(self.system, &pattern_file)?;
        self.system
            .write(&pattern_file, format!("{pattern}\n").as_bytes())
            .with_context(|| {
                format!(
                    "Failed to write sparse-checkout patterns: {}",
                    pattern_file.display()
                )
            })?;

        Ok(())
    }

    fn git(&self, args: &[&str], working_dir: Option<&Path>) -> ShellOutput {
        let args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
        execute(self.system, "git", &args, working_dir)
    }
}

fn require(output: &ShellOutput, step: &str) -> Result<()> {
    if output.succeeded() {
        Ok(())
    } else {
        Err(DocSyncError::git(format!("git {step} failed")).into())
    }
}

/// Check if Git is available and meets minimum version requirements
///
/// # Errors
///
/// Returns an error if:
/// - The Git command is not found or failed
/// - The Git version is older than 2.25 (no `sparse-checkout` support)
#[inline]
pub fn check_git_availability(system: &dyn System) -> Result<()> {
    let output = execute(system, "git", &["--version".to_owned()], None);
    if !output.succeeded() {
        return Err(DocSyncError::git(
            "Git command not found. Please ensure Git is installed and available in PATH",
        )
        .into());
    }

    if let Some(version_part) = output.text().split_whitespace().nth(2)
        && let Ok(version) = parse_git_version(version_part)
        && version < (2, 25, 0)
    {
        return Err(DocSyncError::git(format!(
            "Git version {version_part} is too old. docsync requires Git 2.25.0 or later for sparse checkout support"
        ))
        .into());
    }

    Ok(())
}

/// Parse Git version string into tuple (major, minor, patch)
///
/// # Errors
///
/// Returns an error if the version string is invalid
#[inline]
pub fn parse_git_version(version: &str) -> Result<(u32, u32, u32)> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() >= 3 {
        let major = parts[0].parse().context("Invalid major version")?;
        let minor = parts[1].parse().context("Invalid minor version")?;
        let patch = parts[2].parse().context("Invalid patch version")?;
        Ok((major, minor, patch))
    } else {
        Err(anyhow!("Invalid version format"))
    }
}
