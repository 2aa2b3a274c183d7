/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The document loader that resolves import tags, including under merge keys.
 */

use crate::anchor::extract_anchor;
use crate::cache::GlobCache;
use crate::fs::{FileSystem, NativeFileSystem};
use crate::pattern::{GlobOrder, PathPatternResolver};
use crate::root::ImportRoot;
use crate::tags::ImportTag;
use crate::ImportError;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use stitch_source_map::{FileId, SourceContext, SourceInfo};
use stitch_yaml::{ConstructHooks, Yaml, YamlNode, YamlTag};
use tracing::debug;

/// Configuration for an [`ImportLoader`].
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Directory relative imports resolve against. Defaults to the current
    /// directory, captured on first use.
    pub root_dir: Option<PathBuf>,
    pub glob_order: GlobOrder,
}

impl LoaderOptions {
    pub fn with_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    pub fn with_glob_order(mut self, order: GlobOrder) -> Self {
        self.glob_order = order;
        self
    }
}

/// Loads YAML documents, resolving `!import`, `!import-all`,
/// `!import.anchor` and `!import-all-parameterized` tags.
///
/// Import tags may be used wherever a scalar may, including as the value of a
/// merge key:
///
/// ```yaml
/// merged:
///   <<: [!import a.yml, !import b.yml]
///   extra: true
/// ```
///
/// Merge sources apply in order, so `b.yml` wins over `a.yml` for shared keys
/// and `extra` wins over both.
///
/// Every file the loader reads is registered in its [`SourceContext`], so
/// error locations can be rendered against the right file. Glob results are
/// cached for the lifetime of the loader.
pub struct ImportLoader {
    resolver: PathPatternResolver,
    fs: Rc<dyn FileSystem>,
    source_context: SourceContext,
    /// Registered files by canonical path
    file_ids: HashMap<PathBuf, FileId>,
    loading: Vec<PathBuf>,
}

impl ImportLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self::with_file_system(options, Rc::new(NativeFileSystem))
    }

    /// A loader that reads through `fs` instead of the native filesystem.
    pub fn with_file_system(options: LoaderOptions, fs: Rc<dyn FileSystem>) -> Self {
        let root = match options.root_dir {
            Some(dir) => ImportRoot::at(dir),
            None => ImportRoot::new(),
        };
        let resolver = PathPatternResolver::new(root, Rc::clone(&fs)).with_order(options.glob_order);
        Self {
            resolver,
            fs,
            source_context: SourceContext::new(),
            file_ids: HashMap::new(),
            loading: Vec::new(),
        }
    }

    /// Replace the glob cache.
    pub fn with_cache(mut self, cache: Box<dyn GlobCache>) -> Self {
        self.resolver.set_cache(cache);
        self
    }

    pub fn relative_import_dir(&self) -> PathBuf {
        self.resolver.root().get()
    }

    /// Change the import root. Resolutions already in progress are not
    /// affected.
    pub fn set_relative_import_dir(&mut self, dir: impl Into<PathBuf>) {
        self.resolver.root_mut().set(dir);
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source_context
    }

    pub fn resolver(&self) -> &PathPatternResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut PathPatternResolver {
        &mut self.resolver
    }

    /// Load a file, relative to the import root unless absolute.
    ///
    /// # Errors
    ///
    /// Fails if the file or anything it imports cannot be read, parsed or
    /// resolved.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Yaml, ImportError> {
        let path = self.resolver.root().resolve(path);
        self.load_path(&path, None)
    }

    /// Load a document from a string. `name` identifies it in diagnostics.
    ///
    /// # Errors
    ///
    /// Fails if the document or anything it imports cannot be read, parsed or
    /// resolved.
    pub fn load_str(&mut self, content: &str, name: &str) -> Result<Yaml, ImportError> {
        let file_id = self
            .source_context
            .add_file(name.to_string(), Some(content.to_string()));
        self.construct_document(content, file_id)
    }

    /// Load a whole file. `at` is the node that referenced it, if any.
    pub(crate) fn load_path(
        &mut self,
        path: &Path,
        at: Option<&SourceInfo>,
    ) -> Result<Yaml, ImportError> {
        self.within_file(path, at, |loader, content, file_id| {
            loader.construct_document(content, file_id)
        })
    }

    /// Load only the node anchored as `&anchor` in a file.
    pub(crate) fn load_anchor(
        &mut self,
        path: &Path,
        anchor: &str,
        at: Option<&SourceInfo>,
    ) -> Result<Yaml, ImportError> {
        self.within_file(path, at, |loader, content, file_id| {
            let events = stitch_yaml::parse_events(content, file_id)?;
            let subtree = extract_anchor(&events, anchor, path)?;
            let node = stitch_yaml::compose(subtree)?;
            stitch_yaml::construct(&node, loader)
        })
        .map_err(|e| match at {
            Some(at) => e.with_location(at),
            None => e,
        })
    }

    /// Read `path` and run `body` on its content, with the file marked as
    /// loading so that a nested import of it is reported as a cycle.
    fn within_file<F>(
        &mut self,
        path: &Path,
        at: Option<&SourceInfo>,
        body: F,
    ) -> Result<Yaml, ImportError>
    where
        F: FnOnce(&mut Self, &str, FileId) -> Result<Yaml, ImportError>,
    {
        let canonical = self
            .fs
            .canonicalize(path)
            .map_err(|source| read_error(path, source, at))?;

        if let Some(pos) = self.loading.iter().position(|p| *p == canonical) {
            let mut chain = self.loading[pos..].to_vec();
            chain.push(canonical);
            return Err(ImportError::ImportCycle {
                chain,
                location: at.cloned(),
            });
        }

        let content = self
            .fs
            .read_to_string(&canonical)
            .map_err(|source| read_error(path, source, at))?;
        debug!(path = %path.display(), depth = self.loading.len(), "loading YAML file");

        let file_id = self.register_file(path, &canonical, &content);

        self.loading.push(canonical);
        let result = body(self, &content, file_id);
        self.loading.pop();
        result
    }

    /// The id of `canonical` in the source context. A file read again with
    /// unchanged content keeps its id; changed content gets a new one.
    fn register_file(&mut self, path: &Path, canonical: &Path, content: &str) -> FileId {
        if let Some(&id) = self.file_ids.get(canonical) {
            let stored = self
                .source_context
                .get_file(id)
                .and_then(|file| file.content.as_deref());
            if stored == Some(content) {
                return id;
            }
        }
        let id = self
            .source_context
            .add_file(path.display().to_string(), Some(content.to_string()));
        self.file_ids.insert(canonical.to_path_buf(), id);
        id
    }

    fn construct_document(&mut self, content: &str, file_id: FileId) -> Result<Yaml, ImportError> {
        let node = stitch_yaml::parse_with_file_id(content, file_id)?;
        stitch_yaml::construct(&node, self)
    }
}

impl Default for ImportLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

fn read_error(path: &Path, source: io::Error, at: Option<&SourceInfo>) -> ImportError {
    if source.kind() == io::ErrorKind::NotFound {
        ImportError::NotFound {
            path: path.to_path_buf(),
            location: at.cloned(),
        }
    } else {
        ImportError::Unreadable {
            path: path.to_path_buf(),
            source,
            location: at.cloned(),
        }
    }
}

/// An import-tagged value contributes its list elements as separate sources.
fn push_sources(values: &mut Vec<Yaml>, resolved: Yaml) {
    match resolved {
        Yaml::Array(items) => values.extend(items),
        other => values.push(other),
    }
}

impl ConstructHooks for ImportLoader {
    type Error = ImportError;

    fn construct_tagged(
        &mut self,
        node: &YamlNode,
        tag: &YamlTag,
    ) -> Result<Option<Yaml>, ImportError> {
        match ImportTag::from_tag(tag) {
            Some(tag) => self.construct_import(tag, node).map(Some),
            None => Ok(None),
        }
    }

    fn resolve_merge_value(&mut self, value: &YamlNode) -> Result<Option<Vec<Yaml>>, ImportError> {
        if let Some(tag) = ImportTag::of(value) {
            let mut values = Vec::new();
            push_sources(&mut values, self.construct_import(tag, value)?);
            return Ok(Some(values));
        }

        let Some(items) = value.as_sequence() else {
            return Ok(None);
        };
        if !items.iter().any(|item| ImportTag::of(item).is_some()) {
            return Ok(None);
        }

        let mut values = Vec::with_capacity(items.len());
        for item in items {
            match ImportTag::of(item) {
                Some(tag) => push_sources(&mut values, self.construct_import(tag, item)?),
                None => values.push(stitch_yaml::construct(item, self)?),
            }
        }
        Ok(Some(values))
    }
}

/// Load a file with default options.
///
/// # Errors
///
/// See [`ImportLoader::load_file`].
pub fn load_file(path: impl AsRef<Path>) -> Result<Yaml, ImportError> {
    ImportLoader::default().load_file(path)
}

/// Load a document string with default options.
///
/// # Errors
///
/// See [`ImportLoader::load_str`].
pub fn load_str(content: &str) -> Result<Yaml, ImportError> {
    ImportLoader::default().load_str(content, "<string>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn loader(dir: &TempDir) -> ImportLoader {
        ImportLoader::new(LoaderOptions::default().with_root_dir(dir.path()))
    }

    #[test]
    fn test_plain_document() {
        let dir = project(&[]);
        let value = loader(&dir).load_str("a: 1\n", "inline.yml").unwrap();
        assert_eq!(value["a"].as_i64(), Some(1));
    }

    #[test]
    fn test_every_read_file_is_registered() {
        let dir = project(&[("a.yml", "x: !import b.yml\n"), ("b.yml", "y: 2\n")]);
        let mut loader = loader(&dir);
        loader.load_file("a.yml").unwrap();
        assert_eq!(loader.source_context().file_count(), 2);
    }

    #[test]
    fn test_repeated_imports_reuse_file_id() {
        let dir = project(&[
            (
                "a.yml",
                "x: !import b.yml\ny: !import b.yml\nz: !import.anchor b.yml#v\n",
            ),
            ("b.yml", "v: &v 2\n"),
        ]);
        let mut loader = loader(&dir);
        loader.load_file("a.yml").unwrap();
        loader.load_file("a.yml").unwrap();
        assert_eq!(loader.source_context().file_count(), 2);
    }

    #[test]
    fn test_changed_file_is_registered_again() {
        let dir = project(&[("b.yml", "1\n")]);
        let mut loader = loader(&dir);
        loader.load_file("b.yml").unwrap();
        fs::write(dir.path().join("b.yml"), "2\n").unwrap();
        assert_eq!(loader.load_file("b.yml").unwrap().as_i64(), Some(2));
        assert_eq!(loader.source_context().file_count(), 2);
    }

    #[test]
    fn test_alias_expansion_limit_code() {
        let mut doc = String::from("l0: &l0 [x, x, x, x, x, x, x, x, x, x]\n");
        for level in 1..10 {
            let items = vec![format!("*l{}", level - 1); 10].join(", ");
            doc.push_str(&format!("l{level}: &l{level} [{items}]\n"));
        }
        let dir = project(&[]);
        let err = loader(&dir).load_str(&doc, "doc").unwrap_err();
        assert_eq!(err.code(), "S-1-5");
    }

    #[test]
    fn test_set_relative_import_dir() {
        let first = project(&[("v.yml", "1\n")]);
        let second = project(&[("v.yml", "2\n")]);
        let mut loader = loader(&first);
        assert_eq!(loader.load_str("!import v.yml", "doc").unwrap().as_i64(), Some(1));

        loader.set_relative_import_dir(second.path());
        assert_eq!(loader.relative_import_dir(), second.path());
        assert_eq!(loader.load_str("!import v.yml", "doc").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_merge_with_list_import() {
        let dir = project(&[
            ("parts/1-a.yml", "a: 1\nshared: a\n"),
            ("parts/2-b.yml", "b: 2\nshared: b\n"),
        ]);
        let mut loader = ImportLoader::new(
            LoaderOptions::default()
                .with_root_dir(dir.path())
                .with_glob_order(GlobOrder::Lexicographic),
        );
        let value = loader
            .load_str("all:\n  <<: !import-all parts/*.yml\n", "doc")
            .unwrap();
        assert_eq!(value["all"]["a"].as_i64(), Some(1));
        assert_eq!(value["all"]["b"].as_i64(), Some(2));
        assert_eq!(value["all"]["shared"].as_str(), Some("b"));
    }

    #[test]
    fn test_merge_mixes_imports_and_aliases() {
        let dir = project(&[("a.yml", "x: from-a\ny: from-a\n")]);
        let value = loader(&dir)
            .load_str(
                "base: &base {y: from-alias, z: from-alias}\nm:\n  <<: [!import a.yml, *base]\n",
                "doc",
            )
            .unwrap();
        assert_eq!(value["m"]["x"].as_str(), Some("from-a"));
        assert_eq!(value["m"]["y"].as_str(), Some("from-alias"));
        assert_eq!(value["m"]["z"].as_str(), Some("from-alias"));
    }

    #[test]
    fn test_merge_import_of_scalar_is_rejected() {
        let dir = project(&[("s.yml", "just text\n")]);
        let err = loader(&dir)
            .load_str("m:\n  <<: !import s.yml\n", "doc")
            .unwrap_err();
        assert!(
            err.to_string()
                .starts_with("expected a mapping or list of mappings for merging")
        );
        assert_eq!(err.code(), "S-1-3");
    }

    #[test]
    fn test_missing_file_location() {
        let dir = project(&[]);
        let mut loader = loader(&dir);
        let err = loader.load_str("a: !import nope.yml\n", "doc.yml").unwrap_err();
        assert!(matches!(err, ImportError::NotFound { .. }));
        let location = err.location().unwrap();
        let described = loader.source_context().describe(location).unwrap();
        assert!(described.starts_with("doc.yml:1:"), "{described}");
    }
}
