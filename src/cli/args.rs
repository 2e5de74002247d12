use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for docsync
#[derive(Parser, Debug, Clone)]
#[command(name = "docsync")]
#[command(about = "A CLI tool for aggregating documentation subtrees from multiple Git repositories")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(long, value_name = "PATH", default_value = "./docsync.yaml")]
    pub config: String,

    /// Re-fetch targets that already exist and remove the working clones afterwards
    #[arg(short, long)]
    pub force: bool,

    /// Override the configured docs root
    #[arg(long, value_name = "PATH", env = "DOCSYNC_DOCS_ROOT")]
    pub docs_root: Option<PathBuf>,

    /// Override the configured working directory for temporary clones
    #[arg(long, value_name = "PATH", env = "DOCSYNC_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Preview operations without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}
