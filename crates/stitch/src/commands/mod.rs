//! Command implementations for the stitch CLI
//!
//! Each command module handles the CLI interface and delegates to
//! stitch-import for the actual work.

pub mod compose;
pub mod matches;

use std::path::PathBuf;
use stitch_import::{GlobOrder, LoaderOptions};

/// Loader options from the flags shared by every command.
pub fn loader_options(root: Option<PathBuf>, sorted: bool) -> LoaderOptions {
    let order = if sorted {
        GlobOrder::Lexicographic
    } else {
        GlobOrder::Filesystem
    };
    let options = LoaderOptions::default().with_glob_order(order);
    match root {
        Some(root) => options.with_root_dir(root),
        None => options,
    }
}
