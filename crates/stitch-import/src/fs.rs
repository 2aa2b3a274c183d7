/*
 * fs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filesystem access used by the loader and the glob resolver.
 */

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The filesystem operations import resolution needs.
///
/// Implementations decide where files come from; tests wrap
/// [`NativeFileSystem`] to count or restrict access.
pub trait FileSystem {
    /// Read an entire file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Resolve a path to its canonical absolute form.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] if the path does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// List the regular files below `root`, in enumeration order.
    ///
    /// `max_depth` limits how many directory levels are descended (1 lists
    /// only the direct children of `root`). A missing `root` yields no files.
    fn walk_files(&self, root: &Path, max_depth: Option<usize>) -> io::Result<Vec<PathBuf>>;
}

/// The real filesystem, enumerated with `walkdir`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFileSystem;

impl FileSystem for NativeFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn walk_files(&self, root: &Path, max_depth: Option<usize>) -> io::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
