/*
 * cache.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Caches for resolved glob patterns.
 */

use crate::pattern::GlobMatch;
use std::collections::HashMap;

/// Storage for glob results, keyed by the pattern text after it has been
/// joined to the import root.
///
/// The resolver consults the cache before walking the filesystem and stores
/// every fresh result. Entries are never dropped automatically; callers that
/// expect the filesystem to change call [`GlobCache::invalidate`] or
/// [`GlobCache::clear`].
pub trait GlobCache {
    fn get(&self, pattern: &str) -> Option<Vec<GlobMatch>>;

    fn insert(&mut self, pattern: String, matches: Vec<GlobMatch>);

    /// Drop one pattern. Returns whether it was cached.
    fn invalidate(&mut self, pattern: &str) -> bool;

    fn clear(&mut self);
}

/// In-memory cache that lives as long as its resolver.
#[derive(Debug, Default, Clone)]
pub struct MemoryGlobCache {
    entries: HashMap<String, Vec<GlobMatch>>,
}

impl MemoryGlobCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GlobCache for MemoryGlobCache {
    fn get(&self, pattern: &str) -> Option<Vec<GlobMatch>> {
        self.entries.get(pattern).cloned()
    }

    fn insert(&mut self, pattern: String, matches: Vec<GlobMatch>) {
        self.entries.insert(pattern, matches);
    }

    fn invalidate(&mut self, pattern: &str) -> bool {
        self.entries.remove(pattern).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A cache that stores nothing, so every resolution walks the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGlobCache;

impl GlobCache for NoGlobCache {
    fn get(&self, _pattern: &str) -> Option<Vec<GlobMatch>> {
        None
    }

    fn insert(&mut self, _pattern: String, _matches: Vec<GlobMatch>) {}

    fn invalidate(&mut self, _pattern: &str) -> bool {
        false
    }

    fn clear(&mut self) {}
}
