//! Parse YAML text into composed nodes.

use crate::construct::{StandardHooks, construct};
use crate::{Result, Yaml, YamlNode, compose, parse_events};
use stitch_source_map::FileId;

/// Parse YAML from a string into a node tree.
///
/// Locations are attributed to `FileId(0)`. Only the first document of a
/// multi-document stream is parsed.
///
/// ```rust
/// use stitch_yaml::parse;
///
/// let node = parse("title: My Document").unwrap();
/// assert_eq!(node.get("title").unwrap().as_scalar_str(), Some("My Document"));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid.
pub fn parse(content: &str) -> Result<YamlNode> {
    parse_with_file_id(content, FileId(0))
}

/// Parse YAML from a string registered under `file_id` in a source context.
///
/// # Errors
///
/// Returns an error if the YAML is invalid.
pub fn parse_with_file_id(content: &str, file_id: FileId) -> Result<YamlNode> {
    compose(&parse_events(content, file_id)?)
}

/// Parse and construct with standard YAML semantics (merge keys included).
///
/// # Errors
///
/// Returns an error if the YAML is invalid or cannot be constructed.
pub fn load_str(content: &str) -> Result<Yaml> {
    construct(&parse(content)?, &mut StandardHooks)
}
