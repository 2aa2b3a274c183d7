//! Construction of native values from composed nodes.

use crate::event::{ScalarStyle, YamlTag};
use crate::merge;
use crate::node::{NodeKind, YamlNode};
use crate::{Error, SourceInfo, Yaml};

/// Extension points for [`construct`].
///
/// Both hooks default to "not handled", which gives standard YAML behavior.
pub trait ConstructHooks {
    /// Error type of the hooks; must be able to carry construction errors.
    type Error: From<Error>;

    /// Construct a tagged node.
    ///
    /// Return `Ok(None)` to let standard construction handle the node (unknown
    /// tags are then ignored).
    fn construct_tagged(
        &mut self,
        node: &YamlNode,
        tag: &YamlTag,
    ) -> Result<Option<Yaml>, Self::Error> {
        let _ = (node, tag);
        Ok(None)
    }

    /// Resolve the value of a merge-key entry before it is flattened.
    ///
    /// Returning `Ok(Some(values))` hands already-resolved merge sources to the
    /// flattening step (each must be a mapping). `Ok(None)` keeps the standard
    /// rule: a mapping node or a sequence of mapping nodes.
    fn resolve_merge_value(&mut self, value: &YamlNode) -> Result<Option<Vec<Yaml>>, Self::Error> {
        let _ = value;
        Ok(None)
    }
}

/// Hooks that add nothing to standard construction.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardHooks;

impl ConstructHooks for StandardHooks {
    type Error = Error;
}

/// Construct a `Yaml` value from a node tree.
///
/// # Errors
///
/// Fails on merge values that are not mappings and on scalars that do not fit
/// their core tag (`!!int`, `!!float`, `!!bool`, `!!null`), plus anything the
/// hooks report.
pub fn construct<H>(node: &YamlNode, hooks: &mut H) -> Result<Yaml, H::Error>
where
    H: ConstructHooks + ?Sized,
{
    if let Some(tag) = &node.tag {
        if let Some(value) = hooks.construct_tagged(node, tag)? {
            return Ok(value);
        }
    }

    match &node.kind {
        NodeKind::Scalar { value, style } => {
            Ok(construct_scalar(value, *style, node.tag.as_ref(), &node.source_info)?)
        }
        NodeKind::Sequence(items) => items
            .iter()
            .map(|item| construct(item, hooks))
            .collect::<Result<Vec<_>, _>>()
            .map(Yaml::Array),
        NodeKind::Mapping(entries) => construct_mapping(entries, hooks),
    }
}

fn construct_mapping<H>(entries: &[(YamlNode, YamlNode)], hooks: &mut H) -> Result<Yaml, H::Error>
where
    H: ConstructHooks + ?Sized,
{
    let mut sources = Vec::new();
    let mut own = Vec::with_capacity(entries.len());

    for (key, value) in entries {
        if merge::is_merge_key(key) {
            let resolved = match hooks.resolve_merge_value(value)? {
                Some(values) => merge::resolved_sources(values, &value.source_info)?,
                None => merge::standard_sources(value, |n| construct(n, &mut *hooks))?,
            };
            sources.extend(resolved);
        } else {
            own.push((construct(key, hooks)?, construct(value, hooks)?));
        }
    }

    Ok(Yaml::Hash(merge::flatten(sources, own)))
}

fn construct_scalar(
    value: &str,
    style: ScalarStyle,
    tag: Option<&YamlTag>,
    source_info: &SourceInfo,
) -> Result<Yaml, Error> {
    if let Some(tag) = tag.filter(|t| t.is_core()) {
        let invalid = || Error::InvalidTypedScalar {
            value: value.to_string(),
            tag: tag.to_string(),
            location: source_info.clone(),
        };
        match tag.suffix.as_str() {
            "str" => return Ok(Yaml::String(value.to_string())),
            "int" => {
                return match Yaml::from_str(value) {
                    Yaml::Integer(i) => Ok(Yaml::Integer(i)),
                    _ => Err(invalid()),
                };
            }
            "float" => {
                return match Yaml::from_str(value) {
                    Yaml::Integer(_) | Yaml::Real(_) => Ok(Yaml::Real(value.to_string())),
                    _ => Err(invalid()),
                };
            }
            "bool" => {
                return match Yaml::from_str(value) {
                    Yaml::Boolean(b) => Ok(Yaml::Boolean(b)),
                    _ => Err(invalid()),
                };
            }
            "null" => {
                return match value {
                    "" | "~" | "null" | "Null" | "NULL" => Ok(Yaml::Null),
                    _ => Err(invalid()),
                };
            }
            _ => {}
        }
    }

    Ok(match style {
        ScalarStyle::Plain => Yaml::from_str(value),
        _ => Yaml::String(value.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load_str;
    use crate::parse;

    #[test]
    fn test_plain_scalars_are_typed() {
        let yaml = load_str("i: 42\nf: 1.5\nb: true\nn: ~\ns: hello\n").unwrap();
        assert_eq!(yaml["i"].as_i64(), Some(42));
        assert_eq!(yaml["f"].as_f64(), Some(1.5));
        assert_eq!(yaml["b"].as_bool(), Some(true));
        assert!(yaml["n"].is_null());
        assert_eq!(yaml["s"].as_str(), Some("hello"));
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        let yaml = load_str("a: '42'\nb: \"true\"\n").unwrap();
        assert_eq!(yaml["a"].as_str(), Some("42"));
        assert_eq!(yaml["b"].as_str(), Some("true"));
    }

    #[test]
    fn test_core_tags() {
        let yaml = load_str("a: !!str 42\nb: !!float 3\nc: !!int '7'\n").unwrap();
        assert_eq!(yaml["a"].as_str(), Some("42"));
        assert_eq!(yaml["b"].as_f64(), Some(3.0));
        assert_eq!(yaml["c"].as_i64(), Some(7));
    }

    #[test]
    fn test_bad_core_tag() {
        let err = load_str("a: !!int seven\n").unwrap_err();
        assert!(matches!(err, Error::InvalidTypedScalar { .. }));
        assert_eq!(err.to_string(), "cannot construct 'seven' as !!int");
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let yaml = load_str("a: !custom 5\n").unwrap();
        assert_eq!(yaml["a"].as_i64(), Some(5));
    }

    #[test]
    fn test_scalar_merge_value_is_rejected() {
        let err = load_str("a:\n  <<: just-a-string\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected a mapping or list of mappings for merging, but found scalar"
        );
    }

    #[test]
    fn test_sequence_with_scalar_is_rejected() {
        let err = load_str("a:\n  <<: [{x: 1}, 2]\n").unwrap_err();
        assert!(matches!(err, Error::InvalidMergeValue { found: "scalar", .. }));
    }

    struct Upper;

    impl ConstructHooks for Upper {
        type Error = Error;

        fn construct_tagged(&mut self, node: &YamlNode, tag: &YamlTag) -> Result<Option<Yaml>, Error> {
            if !tag.is_local("upper") {
                return Ok(None);
            }
            Ok(node.as_scalar_str().map(|s| Yaml::String(s.to_uppercase())))
        }

        fn resolve_merge_value(&mut self, value: &YamlNode) -> Result<Option<Vec<Yaml>>, Error> {
            if value.is_plain_scalar("defaults") {
                return Ok(Some(vec![load_str("color: blue\nsize: 3\n")?]));
            }
            Ok(None)
        }
    }

    #[test]
    fn test_hooks_are_consulted() {
        let node = parse("name: !upper stitch\nitem:\n  <<: defaults\n  size: 4\n").unwrap();
        let yaml = construct(&node, &mut Upper).unwrap();
        assert_eq!(yaml["name"].as_str(), Some("STITCH"));
        assert_eq!(yaml["item"]["color"].as_str(), Some("blue"));
        assert_eq!(yaml["item"]["size"].as_i64(), Some(4));
    }
}
