//! Run coordination across all configured repositories

use crate::config::{Config, RepositorySpec};
use crate::error::DocSyncError;
use crate::git::{FetchRequest, SparseCheckout, check_git_availability};
use crate::operations::sync::{SyncOutcome, sync};
use crate::system::System;
use crate::utils::fs::{ensure_directory, remove_dir_safe};
use crate::utils::path::child_path;
use anyhow::Result;
use core::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Per-invocation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Re-fetch existing targets and wipe the working storage at the end
    pub force: bool,
    /// Only report what would happen
    pub dry_run: bool,
}

/// What happened to one repository during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryStatus {
    /// Target already present and the run was not forced
    Skipped,
    /// Dry run: the repository would be fetched and synced
    Planned,
    Synced { files: usize, attempts: u32 },
    /// Every fetch attempt failed
    FetchFailed { attempts: u32 },
    /// The configured source directory is not in the repository
    MissingSource,
    /// Clearing or copying into the target failed
    SyncFailed,
    /// The repository name does not map to a directory inside the work root
    InvalidClonePath,
}

impl RepositoryStatus {
    #[must_use]
    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed { .. }
                | Self::MissingSource
                | Self::SyncFailed
                | Self::InvalidClonePath
        )
    }
}

impl fmt::Display for RepositoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Skipped => write!(f, "skipped (already present)"),
            Self::Planned => write!(f, "would fetch and sync"),
            Self::Synced { files, attempts } => {
                write!(f, "synced {files} files in {attempts} attempt(s)")
            }
            Self::FetchFailed { attempts } => write!(f, "fetch failed after {attempts} attempts"),
            Self::MissingSource => write!(f, "source directory not found"),
            Self::SyncFailed => write!(f, "sync failed"),
            Self::InvalidClonePath => write!(f, "working clone path escapes the work root"),
        }
    }
}

/// Outcome for one configured repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub repo: String,
    pub target: PathBuf,
    pub status: RepositoryStatus,
}

/// Outcome of a whole run, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub repositories: Vec<RepositoryReport>,
}

impl RunReport {
    #[must_use]
    #[inline]
    pub fn synced(&self) -> usize {
        self.count(|status| matches!(status, RepositoryStatus::Synced { .. }))
    }

    #[must_use]
    #[inline]
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, RepositoryStatus::Skipped))
    }

    #[must_use]
    #[inline]
    pub fn failed(&self) -> usize {
        self.count(RepositoryStatus::is_failure)
    }

    /// Reports of the repositories that failed
    #[inline]
    pub fn failures(&self) -> impl Iterator<Item = &RepositoryReport> {
        self.repositories.iter().filter(|r| r.status.is_failure())
    }

    fn count(&self, predicate: impl Fn(&RepositoryStatus) -> bool) -> usize {
        self.repositories
            .iter()
            .filter(|r| predicate(&r.status))
            .count()
    }
}

/// Coordinates fetching and syncing every configured repository
#[non_exhaustive]
pub struct SyncRun<'src> {
    config: Config,
    options: RunOptions,
    system: &'src dyn System,
}

impl<'src> SyncRun<'src> {
    #[must_use]
    #[inline]
    pub const fn new(config: Config, options: RunOptions, system: &'src dyn System) -> Self {
        Self {
            config,
            options,
            system,
        }
    }

    /// Process every repository, one after the other
    ///
    /// Per-repository failures are recorded in the report and never abort the
    /// run.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the docs root or the working storage root
    /// cannot be created
    #[inline]
    pub fn execute(&self) -> Result<RunReport> {
        if self.options.dry_run {
            return Ok(self.preview());
        }

        let docs_root = &self.config.docs_root;
        let work_root = self.config.work_root();

        ensure_directory(self.system, docs_root).map_err(|e| {
            DocSyncError::fatal(format!(
                "Cannot create docs root {}: {e:#}",
                docs_root.display()
            ))
        })?;
        ensure_directory(self.system, &work_root).map_err(|e| {
            DocSyncError::fatal(format!(
                "Cannot create working directory {}: {e:#}",
                work_root.display()
            ))
        })?;

        info!(
            "Syncing {} repositories into {}{}",
            self.config.repositories.len(),
            docs_root.display(),
            if self.options.force { " (forced)" } else { "" }
        );

        let mut report = RunReport::default();
        for (index, spec) in self.config.repositories.iter().enumerate() {
            info!(
                "=> [{}/{}] {} -> {}",
                index + 1,
                self.config.repositories.len(),
                spec.repo,
                spec.target
            );
            let status = self.process_repository(spec, &work_root);
            report.repositories.push(RepositoryReport {
                repo: spec.repo.clone(),
                target: docs_root.join(&spec.target),
                status,
            });
        }

        if self.options.force {
            match remove_dir_safe(self.system, &work_root) {
                Ok(()) => debug!("Removed working directory {}", work_root.display()),
                Err(err) => warn!(
                    "Failed to remove working directory {}: {err:#}",
                    work_root.display()
                ),
            }
        }

        log_summary(&report);
        Ok(report)
    }

    fn process_repository(&self, spec: &RepositorySpec, work_root: &Path) -> RepositoryStatus {
        let target_dir = self.config.docs_root.join(&spec.target);

        if self.system.exists(&target_dir) && !self.options.force {
            warn!(
                "  {} already exists, skipping (use --force to re-fetch)",
                target_dir.display()
            );
            return RepositoryStatus::Skipped;
        }

        let clone_dir = match child_path(work_root, spec.short_name()) {
            Ok(dir) => dir,
            Err(err) => {
                error!("Refusing to fetch {}: {err:#}", spec.repo);
                return RepositoryStatus::InvalidClonePath;
            }
        };
        let source = spec.source_path();
        let request = FetchRequest {
            url: self.config.repository_url(spec),
            branch: spec.branch.clone(),
            source: source.clone(),
            clone_dir: clone_dir.clone(),
        };

        let fetch = SparseCheckout::new(self.system, self.config.retry).fetch(&request);
        if !fetch.success {
            return RepositoryStatus::FetchFailed {
                attempts: fetch.attempts,
            };
        }

        let source_dir = if source.is_empty() {
            clone_dir
        } else {
            clone_dir.join(source)
        };

        match sync(self.system, &source_dir, &target_dir, self.config.sync) {
            SyncOutcome::Synced { files } => RepositoryStatus::Synced {
                files,
                attempts: fetch.attempts,
            },
            SyncOutcome::MissingSource => RepositoryStatus::MissingSource,
            SyncOutcome::Failed => RepositoryStatus::SyncFailed,
        }
    }

    /// Report what would happen without touching git or the filesystem
    fn preview(&self) -> RunReport {
        info!("Dry run preview - no files will be modified:");

        let mut report = RunReport::default();
        for (index, spec) in self.config.repositories.iter().enumerate() {
            let target_dir = self.config.docs_root.join(&spec.target);
            let status = if self.system.exists(&target_dir) && !self.options.force {
                RepositoryStatus::Skipped
            } else {
                RepositoryStatus::Planned
            };

            let source = spec.source_path();
            info!(
                "  [{}] {} ({}) {} -> {}: {status}",
                index + 1,
                self.config.repository_url(spec),
                spec.branch,
                if source.is_empty() { "." } else { source.as_str() },
                target_dir.display()
            );

            report.repositories.push(RepositoryReport {
                repo: spec.repo.clone(),
                target: target_dir,
                status,
            });
        }

        if self.options.force {
            info!(
                "  Would remove working directory {} afterwards",
                self.config.work_root().display()
            );
        }
        info!("Run without --dry-run to execute these operations.");

        report
    }
}

/// Verify the git executable before a real run
///
/// # Errors
///
/// Returns an error if git is missing or too old
#[inline]
pub fn preflight(system: &dyn System, options: RunOptions) -> Result<()> {
    if options.dry_run {
        return Ok(());
    }
    check_git_availability(system)
}

fn log_summary(report: &RunReport) {
    info!(
        "Done: {} synced, {} skipped, {} failed",
        report.synced(),
        report.skipped(),
        report.failed()
    );
    for failure in report.failures() {
        error!(
            "  {} -> {}: {}",
            failure.repo,
            failure.target.display(),
            failure.status
        );
    }
}
