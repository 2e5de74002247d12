//! Subprocess execution that never fails loudly
//!
//! Every git invocation goes through [`execute`]. A failed command is logged
//! together with its command line and turned into an empty [`ShellOutput`];
//! nothing is propagated as an error.

use crate::system::System;
use std::path::Path;
use tracing::{debug, error};

/// Outcome of a shell invocation
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShellOutput {
    /// The command exited zero; holds its trimmed standard output
    Completed(String),
    /// The command could not be spawned or exited nonzero
    Failed,
}

impl ShellOutput {
    /// Trimmed standard output, empty when the command failed
    #[must_use]
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Self::Completed(text) => text,
            Self::Failed => "",
        }
    }

    /// Whether the command exited zero
    #[must_use]
    #[inline]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Run `program args...` in `working_dir` (or the current directory)
///
/// An empty [`ShellOutput::text`] means "no information"; some successful
/// commands legitimately print nothing.
#[inline]
pub fn execute(
    system: &dyn System,
    program: &str,
    args: &[String],
    working_dir: Option<&Path>,
) -> ShellOutput {
    let command_line = render_command_line(program, args);
    debug!("Executing: {command_line}");

    match system.run_command(program, args, working_dir) {
        Ok(output) if output.success => ShellOutput::Completed(output.stdout.trim().to_owned()),
        Ok(output) => {
            let code = output
                .code
                .map_or_else(|| "signal".to_owned(), |code| code.to_string());
            error!(
                "Command failed ({code}): {command_line}: {}",
                output.stderr.trim()
            );
            ShellOutput::Failed
        }
        Err(err) => {
            error!("Failed to execute command: {command_line}: {err}");
            ShellOutput::Failed
        }
    }
}

fn render_command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_owned();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{CommandOutput, MockSystem, RealSystem};
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_execute_trims_output() {
        let system =
            MockSystem::new().with_command_handler(|_, _| Ok(CommandOutput::success("  abc\n")));
        let output = execute(&system, "git", &["status".to_owned()], None);
        assert_eq!(output, ShellOutput::Completed("abc".to_owned()));
        assert!(output.succeeded());
    }

    #[test]
    fn test_nonzero_exit_becomes_empty_failure() {
        let system = MockSystem::new()
            .with_command_handler(|_, _| Ok(CommandOutput::failure(128, "fatal: bad")));
        let output = execute(&system, "git", &["fetch".to_owned()], None);
        assert_eq!(output.text(), "");
        assert!(!output.succeeded());
    }

    #[test]
    fn test_spawn_error_becomes_empty_failure() {
        let system = MockSystem::new().with_command_handler(|_, _| {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such program"))
        });
        let output = execute(&system, "git", &[], None);
        assert_eq!(output, ShellOutput::Failed);
    }

    #[test]
    fn test_execute_runs_in_working_directory() {
        let system = RealSystem::new();
        let temp_dir = TempDir::new().unwrap();
        let output = execute(
            &system,
            "sh",
            &["-c".to_owned(), "echo 'test' > output.txt && echo written".to_owned()],
            Some(temp_dir.path()),
        );

        assert_eq!(output.text(), "written");
        assert!(temp_dir.path().join("output.txt").exists());
    }

    #[test]
    fn test_successful_command_may_print_nothing() {
        let system = RealSystem::new();
        let output = execute(&system, "sh", &["-c".to_owned(), "true".to_owned()], None);
        assert!(output.succeeded());
        assert_eq!(output.text(), "");
    }
}
