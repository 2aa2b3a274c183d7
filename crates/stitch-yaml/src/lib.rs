//! # stitch-yaml
//!
//! The YAML pipeline stitch builds on: events, composition and construction,
//! each stage keeping the information the next one needs.
//!
//! - [`parse_events`] runs `yaml-rust2` and returns [`MarkedEvent`]s that carry
//!   anchor *names* (yaml-rust2 only reports numeric ids), tags, scalar style
//!   and source locations.
//! - [`compose`] assembles events into a [`YamlNode`] tree, expanding aliases.
//! - [`construct`] turns a node tree into a `yaml_rust2::Yaml` value. Callers
//!   plug in behavior through [`ConstructHooks`]: a constructor for tagged
//!   nodes and an override point for merge-key (`<<`) sources.
//!
//! ## Example
//!
//! ```rust
//! use stitch_yaml::load_str;
//!
//! let yaml = load_str(
//!     r#"
//! base: &base
//!   color: red
//!   size: 1
//! item:
//!   <<: *base
//!   size: 2
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(yaml["item"]["color"].as_str(), Some("red"));
//! assert_eq!(yaml["item"]["size"].as_i64(), Some(2));
//! ```

mod composer;
mod construct;
mod error;
mod event;
pub mod merge;
mod node;
mod parser;

pub use composer::{MAX_ALIAS_EXPANSION, compose};
pub use construct::{ConstructHooks, StandardHooks, construct};
pub use error::{Error, Result};
pub use event::{MarkedEvent, ScalarStyle, YamlEvent, YamlTag, parse_events};
pub use node::{NodeKind, YamlNode};
pub use parser::{load_str, parse, parse_with_file_id};
pub use stitch_source_map::SourceInfo;
pub use yaml_rust2::Yaml;
pub use yaml_rust2::yaml::Hash;
