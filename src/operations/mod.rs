//! Operations module
//!
//! Coordinates a run: fetching each repository and syncing it into the docs root

pub mod run;
pub mod sync;

pub use run::*;
pub use sync::*;
