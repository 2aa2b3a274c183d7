/*
 * root.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The base directory relative import paths resolve against.
 */

use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};

/// The import root: the single directory every relative import path and
/// relative glob pattern is resolved against.
///
/// Paths are never resolved against the importing file's own directory. An
/// unset root captures the current working directory the first time it is
/// read; [`ImportRoot::set`] replaces the value for every later resolution.
#[derive(Debug, Clone, Default)]
pub struct ImportRoot {
    dir: OnceCell<PathBuf>,
}

impl ImportRoot {
    /// A root that defaults to the current directory on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// A root fixed to `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: OnceCell::with_value(dir.into()),
        }
    }

    pub fn get(&self) -> PathBuf {
        self.dir
            .get_or_init(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
            .clone()
    }

    pub fn set(&mut self, dir: impl Into<PathBuf>) {
        self.dir = OnceCell::with_value(dir.into());
    }

    /// Join a relative path to the root. Absolute paths pass through.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.get().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_current_dir() {
        let root = ImportRoot::new();
        assert_eq!(root.get(), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_set_overrides_later_resolutions() {
        let mut root = ImportRoot::new();
        let _ = root.get();
        root.set("/project");
        assert_eq!(root.resolve("a/b.yml"), PathBuf::from("/project/a/b.yml"));
    }

    #[test]
    fn test_absolute_paths_pass_through() {
        let root = ImportRoot::at("/project");
        assert_eq!(root.resolve("/etc/x.yml"), PathBuf::from("/etc/x.yml"));
    }
}
