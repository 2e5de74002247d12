//! # `docsync`
//!
//! `docsync` pulls documentation subtrees out of several Git repositories and
//! lays them side by side under one local docs root, ready for a static site
//! generator.
//!
//! ## Usage
//!
//! ```sh
//! docsync --config docsync.yaml          # fetch targets that are missing
//! docsync --config docsync.yaml --force  # re-fetch everything, drop clones
//! ```
//!
//! Failed repositories are logged and skipped; the exit status is nonzero
//! only for configuration errors and fatal filesystem errors.

use anyhow::Result;
use clap::Parser as _;
use docsync::cli::Args;
use docsync::error::DocSyncError;
use docsync::system::RealSystem;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    let system = RealSystem::new();
    match docsync::run(&args, &system) {
        Ok(_report) => std::process::exit(0),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(
                err.downcast_ref::<DocSyncError>()
                    .map_or(1, DocSyncError::exit_code),
            );
        }
    }
}
