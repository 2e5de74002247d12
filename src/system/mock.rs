//! Mock system implementation for testing

use super::{CommandOutput, System, WalkEntry};
use core::time::Duration;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A subprocess invocation recorded by [`MockSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl CommandInvocation {
    /// Render the invocation as a single space-separated command line
    #[must_use]
    #[inline]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// The first argument, e.g. `clone` for `git clone ...`
    #[must_use]
    #[inline]
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

type CommandHandler =
    dyn Fn(&MockSystem, &CommandInvocation) -> io::Result<CommandOutput> + Send + Sync;

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem, a scriptable command
/// handler and a sleep recorder, perfect for fast, isolated unit tests
/// without side effects.
///
/// # Example
/// ```
/// use docsync::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_file("/test/file.txt", b"Hello, world!").unwrap()
///     .with_dir("/test/subdir").unwrap();
///
/// assert!(system.exists(Path::new("/test/file.txt")));
/// assert!(system.is_dir(Path::new("/test/subdir")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
    handler: Arc<RwLock<Option<Arc<CommandHandler>>>>,
}

struct MockSystemState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    unwritable: Vec<PathBuf>,
    commands: Vec<CommandInvocation>,
    sleeps: Vec<Duration>,
}

fn poisoned<E: ToString>(err: E) -> io::Error {
    io::Error::other(err.to_string())
}

fn not_found(what: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{what} not found: {}", path.display()),
    )
}

impl MockSystem {
    /// Create a new `MockSystem` with an empty filesystem rooted at `/`
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                unwritable: Vec::new(),
                commands: Vec::new(),
                sleeps: Vec::new(),
            })),
            handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        self.put_file(path, contents)?;
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        self.put_dir(path)?;
        Ok(self)
    }

    /// Make every write, copy or directory creation at or below `path` fail
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_unwritable<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.unwritable.push(path.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Install the handler that answers `run_command` calls
    ///
    /// Without a handler every command succeeds with empty output.
    #[must_use]
    #[inline]
    pub fn with_command_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&Self, &CommandInvocation) -> io::Result<CommandOutput> + Send + Sync + 'static,
    {
        let handler: Arc<CommandHandler> = Arc::new(handler);
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(handler);
        }
        self
    }

    /// Create a file, including missing parent directories
    ///
    /// Intended for command handlers that simulate side effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn put_file<P: AsRef<Path>>(&self, path: P, contents: &[u8]) -> io::Result<()> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.state.write().map_err(poisoned)?;
        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }
        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(())
    }

    /// Create a directory, including missing parents
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn put_dir<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        Self::ensure_parent_dirs(&mut state.dirs, path.as_ref());
        drop(state);
        Ok(())
    }

    /// All commands run so far, in order
    #[must_use]
    #[inline]
    pub fn commands(&self) -> Vec<CommandInvocation> {
        self.state
            .read()
            .map(|state| state.commands.clone())
            .unwrap_or_default()
    }

    /// All sleeps requested so far, in order
    #[must_use]
    #[inline]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state
            .read()
            .map(|state| state.sleeps.clone())
            .unwrap_or_default()
    }

    /// Every file path currently stored, sorted
    #[must_use]
    #[inline]
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .state
            .read()
            .map(|state| state.files.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor == Path::new("") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_writable(state: &MockSystemState, path: &Path) -> io::Result<()> {
        if state.unwritable.iter().any(|p| path.starts_with(p)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    fn children(state: &MockSystemState, path: &Path) -> BTreeSet<PathBuf> {
        state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path) && p.as_path() != path)
            .cloned()
            .collect()
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let state = self.state.read().map_err(poisoned)?;
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("File", path))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        Self::check_writable(&state, path)?;

        if let Some(parent) = path.parent()
            && !state.dirs.contains(parent)
        {
            return Err(not_found("Parent directory", parent));
        }
        if state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.dirs.contains(path) {
            return Ok(());
        }
        Self::check_writable(&state, path)?;
        if let Some(file) = path.ancestors().find(|p| state.files.contains_key(*p)) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Not a directory: {}", file.display()),
            ));
        }
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.dirs.contains(path) {
            return Err(not_found("Directory", path));
        }
        Self::check_writable(&state, path)?;

        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        drop(state);
        Ok(())
    }

    #[inline]
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.files.contains_key(path) {
            return Err(not_found("File", path));
        }
        Self::check_writable(&state, path)?;
        state.files.remove(path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let contents = self.read(from)?;
        let size = u64::try_from(contents.len()).unwrap_or(u64::MAX);
        self.write(to, &contents)?;
        Ok(size)
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.dirs.contains(path))
    }

    #[inline]
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.read().map_err(poisoned)?;
        if !state.dirs.contains(path) {
            return Err(not_found("Directory", path));
        }
        Ok(Self::children(&state, path).into_iter().collect())
    }

    #[inline]
    fn walk_dir(&self, path: &Path) -> io::Result<Vec<WalkEntry>> {
        let state = self.state.read().map_err(poisoned)?;
        if !state.dirs.contains(path) {
            return Err(not_found("Directory", path));
        }

        let mut entries: Vec<WalkEntry> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.starts_with(path) && p.as_path() != path)
            .map(|p| WalkEntry {
                path: p.clone(),
                is_file: state.files.contains_key(p),
                is_dir: state.dirs.contains(p),
            })
            .collect();
        drop(state);

        // Sort entries by path for deterministic output
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    #[inline]
    fn run_command(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> io::Result<CommandOutput> {
        let invocation = CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
            working_dir: working_dir.map(Path::to_path_buf),
        };

        let mut state = self.state.write().map_err(poisoned)?;
        state.commands.push(invocation.clone());
        drop(state);

        let handler = self.handler.read().map_err(poisoned)?.clone();
        match handler {
            Some(handler) => handler(self, &invocation),
            None => Ok(CommandOutput::success("")),
        }
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        if let Ok(mut state) = self.state.write() {
            state.sleeps.push(duration);
        }
    }
}
