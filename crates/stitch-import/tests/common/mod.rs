//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use stitch_import::{FileSystem, ImportLoader, LoaderOptions, NativeFileSystem};
use tempfile::TempDir;

/// Create a temporary project containing `files` (path, content).
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    for (name, content) in files {
        let path = temp.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create fixture dir");
        fs::write(&path, content).expect("Failed to write fixture");
    }
    temp
}

/// A loader rooted at `dir`.
pub fn loader_at(dir: &Path) -> ImportLoader {
    ImportLoader::new(LoaderOptions::default().with_root_dir(dir))
}

/// Native filesystem access that counts directory walks.
#[derive(Default)]
pub struct CountingFileSystem {
    walks: Cell<usize>,
}

impl CountingFileSystem {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn walks(&self) -> usize {
        self.walks.get()
    }
}

impl FileSystem for CountingFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        NativeFileSystem.read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        NativeFileSystem.canonicalize(path)
    }

    fn walk_files(&self, root: &Path, max_depth: Option<usize>) -> io::Result<Vec<PathBuf>> {
        self.walks.set(self.walks.get() + 1);
        NativeFileSystem.walk_files(root, max_depth)
    }
}
