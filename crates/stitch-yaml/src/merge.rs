//! Merge-key (`<<`) flattening.
//!
//! A mapping entry whose key is the merge key pulls the entries of one or
//! more other mappings into the enclosing mapping. Sources are applied in the
//! order they are listed, so a later source overrides an earlier one for a
//! shared key, and keys written in the mapping itself override every merged
//! source. A key keeps the position where it was first seen.

use crate::node::{NodeKind, YamlNode};
use crate::{Error, Hash, SourceInfo, Yaml};

/// True if `key` is the merge key: a plain, untagged `<<` or a `!!merge` tag.
pub fn is_merge_key(key: &YamlNode) -> bool {
    match &key.tag {
        Some(tag) => tag.is_core() && tag.suffix == "merge",
        None => key.is_plain_scalar("<<"),
    }
}

/// Collect the merge sources named by a standard merge value: a mapping node,
/// or a sequence of mapping nodes.
///
/// `construct` is used to turn each mapping node into a value.
///
/// # Errors
///
/// Anything else fails with [`Error::InvalidMergeValue`].
pub fn standard_sources<E, F>(value: &YamlNode, mut construct: F) -> Result<Vec<Hash>, E>
where
    E: From<Error>,
    F: FnMut(&YamlNode) -> Result<Yaml, E>,
{
    match &value.kind {
        NodeKind::Mapping(_) => Ok(vec![expect_hash(construct(value)?, &value.source_info)?]),
        NodeKind::Sequence(items) => {
            let mut sources = Vec::with_capacity(items.len());
            for item in items {
                if !matches!(item.kind, NodeKind::Mapping(_)) {
                    return Err(invalid_merge(item.kind_name(), &item.source_info).into());
                }
                sources.push(expect_hash(construct(item)?, &item.source_info)?);
            }
            Ok(sources)
        }
        NodeKind::Scalar { .. } => Err(invalid_merge(value.kind_name(), &value.source_info).into()),
    }
}

/// Validate already-resolved merge values; every one must be a mapping.
///
/// # Errors
///
/// Fails with [`Error::InvalidMergeValue`] located at `location`.
pub fn resolved_sources(values: Vec<Yaml>, location: &SourceInfo) -> Result<Vec<Hash>, Error> {
    values
        .into_iter()
        .map(|value| expect_hash(value, location))
        .collect()
}

/// Merge `sources` (first to last) and then the mapping's own entries.
pub fn flatten(sources: Vec<Hash>, own: Vec<(Yaml, Yaml)>) -> Hash {
    let mut result = Hash::new();
    for source in sources {
        for (key, value) in source {
            set_keeping_position(&mut result, key, value);
        }
    }
    for (key, value) in own {
        set_keeping_position(&mut result, key, value);
    }
    result
}

/// Insert or overwrite, keeping an existing key where it already is.
pub fn set_keeping_position(hash: &mut Hash, key: Yaml, value: Yaml) {
    match hash.get_mut(&key) {
        Some(slot) => *slot = value,
        None => {
            hash.insert(key, value);
        }
    }
}

/// Short name of a constructed value's kind, for error messages.
pub fn value_kind_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Hash(_) => "mapping",
        Yaml::Array(_) => "sequence",
        Yaml::Null => "null",
        Yaml::String(_) => "string",
        Yaml::Integer(_) => "integer",
        Yaml::Real(_) => "float",
        Yaml::Boolean(_) => "boolean",
        _ => "scalar",
    }
}

fn expect_hash(value: Yaml, location: &SourceInfo) -> Result<Hash, Error> {
    match value {
        Yaml::Hash(hash) => Ok(hash),
        other => Err(invalid_merge(value_kind_name(&other), location)),
    }
}

fn invalid_merge(found: &'static str, location: &SourceInfo) -> Error {
    Error::InvalidMergeValue {
        found,
        location: location.clone(),
    }
}
