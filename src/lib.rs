//! `docsync` - A CLI tool for aggregating documentation from Git repositories
//!
//! This library fetches a single subdirectory from each configured
//! repository using shallow sparse clones, retries failed fetches, and
//! mirrors each subtree into its own directory under a local docs root.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use config::Config;
use operations::{RunOptions, RunReport, SyncRun, preflight};
use system::System;

/// Main entry point for the docsync library
///
/// # Errors
///
/// Returns an error if the configuration is invalid, git is unavailable,
/// or the docs root or working directory cannot be created
pub fn run(args: &Args, system: &dyn System) -> Result<RunReport> {
    let mut config = Config::load_from_file(system, &args.config)?;

    // CLI overrides
    if let Some(docs_root) = args.docs_root.as_ref() {
        config.docs_root.clone_from(docs_root);
    }
    if let Some(work_dir) = args.work_dir.as_ref() {
        config.work_dir = Some(work_dir.clone());
    }

    let options = RunOptions {
        force: args.force,
        dry_run: args.dry_run,
    };

    preflight(system, options)?;

    SyncRun::new(config, options, system).execute()
}
