/*
 * pattern.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Glob patterns with named captures, and the memoizing resolver.
 */

//! Glob patterns with named captures.
//!
//! Supported syntax, per `/`-separated segment:
//!
//! - `*` any run of characters within one segment, `?` one character
//! - `[abc]`, `[a-z]`, `[!abc]` character classes
//! - `**` zero or more whole segments
//! - `{name:*}` like `*`, capturing the text as `name`
//! - `{name:**}` like `**`, capturing the matched segments joined with `/`
//!   (the empty string when no segment matched)
//!
//! A recursive wildcard must be a segment on its own: `a/**/b.yml` is valid,
//! `a/x**/b.yml` is not.

use crate::ImportError;
use crate::cache::{GlobCache, MemoryGlobCache};
use crate::fs::FileSystem;
use crate::root::ImportRoot;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace};

/// A file matched by a glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatch {
    pub path: PathBuf,
    /// Captured placeholder values, in the order the placeholders appear.
    pub captures: Vec<(String, String)>,
}

impl GlobMatch {
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A malformed glob pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unmatched brace in glob pattern '{pattern}'")]
    UnmatchedBrace { pattern: String },

    #[error("unknown capture kind ':{kind}' for '{name}' in glob pattern '{pattern}' (expected '*' or '**')")]
    UnknownCaptureKind {
        pattern: String,
        name: String,
        kind: String,
    },

    #[error("invalid capture name '{name}' in glob pattern '{pattern}'")]
    InvalidCaptureName { pattern: String, name: String },

    #[error("capture '{name}' appears more than once in glob pattern '{pattern}'")]
    DuplicateCapture { pattern: String, name: String },

    #[error("unterminated character class in glob pattern '{pattern}'")]
    UnterminatedClass { pattern: String },

    #[error("recursive wildcard must be a whole path segment, found '{segment}' in glob pattern '{pattern}'")]
    RecursiveNotSegment { pattern: String, segment: String },

    #[error("glob pattern '{pattern}' could not be compiled: {message}")]
    Compile { pattern: String, message: String },
}

impl PatternError {
    /// The offending pattern text.
    pub fn pattern(&self) -> &str {
        match self {
            PatternError::UnmatchedBrace { pattern }
            | PatternError::UnknownCaptureKind { pattern, .. }
            | PatternError::InvalidCaptureName { pattern, .. }
            | PatternError::DuplicateCapture { pattern, .. }
            | PatternError::UnterminatedClass { pattern }
            | PatternError::RecursiveNotSegment { pattern, .. }
            | PatternError::Compile { pattern, .. } => pattern,
        }
    }
}

/// Order of the matches a resolution returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlobOrder {
    /// The order the filesystem enumerates directory entries in.
    #[default]
    Filesystem,
    /// Sorted by path.
    Lexicographic,
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    text: String,
    regex: Regex,
    captures: Vec<String>,
    base: PathBuf,
    max_depth: Option<usize>,
}

enum Segment {
    Literal(String),
    Wild(String),
    Recursive(Option<String>),
}

impl PathPattern {
    /// Compile `pattern`, a `/`-separated glob.
    ///
    /// # Errors
    ///
    /// Fails with a [`PatternError`] naming the pattern when a placeholder or
    /// character class is malformed.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut names = Vec::new();
        let segments = pattern
            .split('/')
            .map(|segment| compile_segment(pattern, segment, &mut names))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(PatternError::DuplicateCapture {
                    pattern: pattern.to_string(),
                    name: name.clone(),
                });
            }
        }

        // Walk from the longest run of literal segments, leaving the last
        // segment to the matcher.
        let literal_count = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .take_while(|s| matches!(s, Segment::Literal(_)))
            .count();
        let base = match literal_count {
            0 => PathBuf::from("."),
            n => {
                let text = pattern.split('/').take(n).collect::<Vec<_>>().join("/");
                if text.is_empty() {
                    PathBuf::from("/")
                } else {
                    PathBuf::from(text)
                }
            }
        };
        let rest = &segments[literal_count..];
        let max_depth = if rest.iter().any(|s| matches!(s, Segment::Recursive(_))) {
            None
        } else {
            Some(rest.len())
        };

        let mut source = String::from("^");
        if literal_count == 0 {
            source.push_str(r"(?:\./)?");
        }
        let last = segments.len() - 1;
        let mut after_recursive = false;
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 && !after_recursive {
                source.push('/');
            }
            after_recursive = false;
            match segment {
                Segment::Literal(re) | Segment::Wild(re) => source.push_str(re),
                Segment::Recursive(name) => {
                    let group = match name {
                        Some(name) => format!("(?P<{name}>[^/]+(?:/[^/]+)*)"),
                        None => "(?:[^/]+(?:/[^/]+)*)".to_string(),
                    };
                    if i == last {
                        source.push_str(&group);
                    } else {
                        source.push_str(&format!("(?:{group}/)?"));
                        after_recursive = true;
                    }
                }
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::Compile {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            text: pattern.to_string(),
            regex,
            captures: names,
            base,
            max_depth,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The directory the walk starts from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// How deep below [`PathPattern::base`] a match can be, if bounded.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn capture_names(&self) -> &[String] {
        &self.captures
    }

    /// Match a file path, returning its captures on success.
    pub fn match_path(&self, path: &Path) -> Option<GlobMatch> {
        let text = slash_path(path);
        let caps = self.regex.captures(&text)?;
        let captures = self
            .captures
            .iter()
            .map(|name| {
                let value = caps.name(name).map_or("", |m| m.as_str());
                (name.clone(), value.to_string())
            })
            .collect();
        Some(GlobMatch {
            path: path.to_path_buf(),
            captures,
        })
    }
}

fn compile_segment(
    pattern: &str,
    segment: &str,
    names: &mut Vec<String>,
) -> Result<Segment, PatternError> {
    if segment == "**" {
        return Ok(Segment::Recursive(None));
    }
    if let Some(name) = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix(":**}"))
    {
        check_capture_name(pattern, name)?;
        names.push(name.to_string());
        return Ok(Segment::Recursive(Some(name.to_string())));
    }

    let mut re = String::new();
    let mut wild = false;
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    return Err(recursive_not_segment(pattern, segment));
                }
                re.push_str("[^/]*");
                wild = true;
            }
            '?' => {
                re.push_str("[^/]");
                wild = true;
            }
            '[' => {
                re.push_str(&compile_class(pattern, &mut chars)?);
                wild = true;
            }
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }
                if !closed {
                    return Err(PatternError::UnmatchedBrace {
                        pattern: pattern.to_string(),
                    });
                }
                let (name, kind) = body.split_once(':').unwrap_or((body.as_str(), ""));
                match kind {
                    "*" => {
                        check_capture_name(pattern, name)?;
                        names.push(name.to_string());
                        re.push_str(&format!("(?P<{name}>[^/]*)"));
                    }
                    "**" => return Err(recursive_not_segment(pattern, segment)),
                    _ => {
                        return Err(PatternError::UnknownCaptureKind {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                            kind: kind.to_string(),
                        });
                    }
                }
                wild = true;
            }
            '}' => {
                return Err(PatternError::UnmatchedBrace {
                    pattern: pattern.to_string(),
                });
            }
            _ => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    Ok(if wild {
        Segment::Wild(re)
    } else {
        Segment::Literal(re)
    })
}

/// Translate a `[...]` class; the opening bracket has been consumed.
fn compile_class(
    pattern: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<String, PatternError> {
    let mut class = String::from("[");
    let negated = chars.next_if(|c| *c == '!' || *c == '^').is_some();
    if negated {
        class.push('^');
    }
    let mut first = true;
    loop {
        match chars.next() {
            None => {
                return Err(PatternError::UnterminatedClass {
                    pattern: pattern.to_string(),
                });
            }
            Some(']') if !first => break,
            Some(c @ ('\\' | '[' | ']' | '^' | '&' | '~')) => {
                class.push('\\');
                class.push(c);
            }
            Some(c) => class.push(c),
        }
        first = false;
    }
    if negated {
        class.push('/');
    }
    class.push(']');
    Ok(class)
}

fn check_capture_name(pattern: &str, name: &str) -> Result<(), PatternError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PatternError::InvalidCaptureName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        })
    }
}

fn recursive_not_segment(pattern: &str, segment: &str) -> PatternError {
    PatternError::RecursiveNotSegment {
        pattern: pattern.to_string(),
        segment: segment.to_string(),
    }
}

/// Path text with `/` separators, the form patterns are written in.
pub(crate) fn slash_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

/// Expands glob patterns relative to an import root, memoizing results.
pub struct PathPatternResolver {
    root: ImportRoot,
    fs: Rc<dyn FileSystem>,
    cache: Box<dyn GlobCache>,
    order: GlobOrder,
}

impl PathPatternResolver {
    /// A resolver with an in-memory cache.
    pub fn new(root: ImportRoot, fs: Rc<dyn FileSystem>) -> Self {
        Self {
            root,
            fs,
            cache: Box::new(MemoryGlobCache::new()),
            order: GlobOrder::default(),
        }
    }

    pub fn with_order(mut self, order: GlobOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_cache(mut self, cache: Box<dyn GlobCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn set_cache(&mut self, cache: Box<dyn GlobCache>) {
        self.cache = cache;
    }

    pub fn cache(&self) -> &dyn GlobCache {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> &mut dyn GlobCache {
        self.cache.as_mut()
    }

    pub fn order(&self) -> GlobOrder {
        self.order
    }

    pub fn root(&self) -> &ImportRoot {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ImportRoot {
        &mut self.root
    }

    /// The cache key for `pattern`: its text joined to the import root.
    pub fn cache_key(&self, pattern: &str) -> String {
        slash_path(&self.root.resolve(pattern))
    }

    /// Expand `pattern` into the files it matches.
    ///
    /// The first resolution of a pattern walks the filesystem; later ones are
    /// answered from the cache. No matches is an empty list, not an error.
    ///
    /// Only the pattern text is glob syntax. A relative pattern is matched
    /// against walked paths with the root stripped, so the root directory may
    /// contain `[`, `{` or `*` without being read as a wildcard.
    ///
    /// # Errors
    ///
    /// Fails on a malformed pattern or when a directory cannot be read.
    pub fn resolve(&mut self, pattern: &str) -> Result<Vec<GlobMatch>, ImportError> {
        let key = self.cache_key(pattern);
        if let Some(matches) = self.cache.get(&key) {
            trace!(pattern = %key, matches = matches.len(), "glob cache hit");
            return Ok(matches);
        }

        let compiled = PathPattern::compile(pattern)?;
        let root = if Path::new(pattern).is_absolute() {
            None
        } else {
            Some(self.root.get())
        };
        let base = match &root {
            Some(root) if compiled.base() == Path::new(".") => root.clone(),
            Some(root) => root.join(compiled.base()),
            None => compiled.base().to_path_buf(),
        };
        debug!(pattern = %key, base = %base.display(), "expanding glob");
        let files = self
            .fs
            .walk_files(&base, compiled.max_depth())
            .map_err(|source| ImportError::Walk {
                pattern: key.clone(),
                source,
            })?;

        let mut matches: Vec<GlobMatch> = files
            .into_iter()
            .filter_map(|path| {
                let relative = match &root {
                    Some(root) => path.strip_prefix(root).ok()?,
                    None => path.as_path(),
                };
                let captures = compiled.match_path(relative)?.captures;
                Some(GlobMatch { path, captures })
            })
            .collect();
        if self.order == GlobOrder::Lexicographic {
            matches.sort_by(|a, b| a.path.cmp(&b.path));
        }
        debug!(pattern = %key, matches = matches.len(), "glob expanded");

        self.cache.insert(key, matches.clone());
        Ok(matches)
    }
}
