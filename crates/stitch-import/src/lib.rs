/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Import tags for YAML documents.
 */

//! Import tags for YAML documents.
//!
//! This crate composes YAML documents out of other YAML files:
//!
//! | Tag | Value |
//! |---|---|
//! | `!import path.yml` | the whole target document |
//! | `!import-all dir/*.yml` | a list of every matched document |
//! | `!import.anchor path.yml#name` | only the node anchored `&name` in the target |
//! | `!import-all-parameterized items/{name:*}.yml` | a list of matched mappings, each with its captures added as keys |
//!
//! Relative paths and patterns resolve against a single import root (the
//! current directory unless configured), never against the importing file.
//! Import tags are also accepted as merge-key values, alone or inside a
//! sequence: `<<: [!import a.yml, !import b.yml]`.
//!
//! ```no_run
//! use stitch_import::{ImportLoader, LoaderOptions};
//!
//! let mut loader = ImportLoader::new(LoaderOptions::default().with_root_dir("config"));
//! let site = loader.load_file("site.yml")?;
//! println!("{:?}", site["title"].as_str());
//! # Ok::<(), stitch_import::ImportError>(())
//! ```

pub mod anchor;
pub mod cache;
mod error;
pub mod fs;
mod loader;
pub mod pattern;
pub mod root;
pub mod tags;

pub use anchor::extract_anchor;
pub use cache::{GlobCache, MemoryGlobCache, NoGlobCache};
pub use error::ImportError;
pub use fs::{FileSystem, NativeFileSystem};
pub use loader::{ImportLoader, LoaderOptions, load_file, load_str};
pub use pattern::{GlobMatch, GlobOrder, PathPattern, PathPatternResolver, PatternError};
pub use root::ImportRoot;
pub use tags::{ImportTag, parse_anchor_ref};
pub use yaml_rust2::Yaml;
