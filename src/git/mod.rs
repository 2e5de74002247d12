//! Git operations module
//!
//! Handles working clone acquisition with sparse checkout and retries

pub mod sparse_checkout;

pub use sparse_checkout::*;
