//! System abstraction for filesystem, subprocess and timing operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations.

use core::time::Duration;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Entry from directory walking
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_file: bool,
    pub is_dir: bool,
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CommandOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given standard output
    #[must_use]
    #[inline]
    pub fn success<S: Into<String>>(stdout: S) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and standard error
    #[must_use]
    #[inline]
    pub fn failure<S: Into<String>>(code: i32, stderr: S) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Unified trait for system operations (filesystem + subprocesses + time)
///
/// This trait abstracts all interactions with the operating system.
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs`, `std::process` and `walkdir`
/// - `MockSystem`: Test implementation using in-memory storage and scripted commands
pub trait System: Send + Sync {
    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read entire file contents as bytes
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes to a file, creating it if it doesn't exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and all its contents
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Copy a file from source to destination
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Read directory entries, returning paths of all entries sorted by name
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Recursively walk a directory, returning all entries
    ///
    /// Entries are sorted by path and exclude the root itself.
    fn walk_dir(&self, path: &Path) -> io::Result<Vec<WalkEntry>>;

    // ==================== Process Operations ====================

    /// Run a program to completion and capture its output
    ///
    /// An `Err` means the process could not be spawned at all; a process that
    /// ran and exited nonzero is reported through [`CommandOutput::success`].
    fn run_command(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> io::Result<CommandOutput>;

    // ==================== Time ====================

    /// Block the current thread for the given duration
    fn sleep(&self, duration: Duration);
}
