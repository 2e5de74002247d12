//! Utility module
//!
//! Filesystem helpers, path validation and the shell executor

pub mod fs;
pub mod path;
pub mod shell;
