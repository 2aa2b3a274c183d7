//! Composed YAML nodes.

use crate::event::{ScalarStyle, YamlTag};
use crate::SourceInfo;

/// A composed YAML node.
///
/// Unlike `yaml_rust2::Yaml`, a node still knows its tag, its anchor and where
/// it came from, which is what tag constructors and error messages need.
/// Aliases have already been replaced by a copy of the anchored node.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    pub kind: NodeKind,
    pub tag: Option<YamlTag>,
    pub anchor: Option<String>,
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar { value: String, style: ScalarStyle },
    Sequence(Vec<YamlNode>),
    Mapping(Vec<(YamlNode, YamlNode)>),
}

impl YamlNode {
    /// A plain, untagged scalar.
    pub fn plain_scalar(value: impl Into<String>, source_info: SourceInfo) -> Self {
        YamlNode {
            kind: NodeKind::Scalar {
                value: value.into(),
                style: ScalarStyle::Plain,
            },
            tag: None,
            anchor: None,
            source_info,
        }
    }

    /// Short name of the node kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Scalar { .. } => "scalar",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Mapping(_) => "mapping",
        }
    }

    /// The raw text of a scalar node.
    pub fn as_scalar_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar { .. })
    }

    pub fn is_plain_scalar(&self, text: &str) -> bool {
        matches!(
            &self.kind,
            NodeKind::Scalar { value, style: ScalarStyle::Plain } if value == text
        )
    }

    pub fn as_sequence(&self) -> Option<&[YamlNode]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(YamlNode, YamlNode)]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping value by the text of a scalar key.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_scalar_str() == Some(key))
            .map(|(_, v)| v)
    }
}
