/*
 * tags.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Constructors for the import tag family.
 */

use crate::{ImportError, ImportLoader};
use stitch_yaml::merge::{set_keeping_position, value_kind_name};
use stitch_yaml::{Hash, Yaml, YamlNode, YamlTag};

/// The import tags, all written with the local `!` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTag {
    /// `!import path`: the whole target document
    Import,
    /// `!import-all glob`: a list of every matched document
    ImportAll,
    /// `!import.anchor path#anchor`: one anchored node of the target
    ImportAnchor,
    /// `!import-all-parameterized glob`: matched documents plus their captures
    ImportAllParameterized,
}

impl ImportTag {
    pub fn from_tag(tag: &YamlTag) -> Option<Self> {
        if tag.handle != "!" {
            return None;
        }
        match tag.suffix.as_str() {
            "import" => Some(ImportTag::Import),
            "import-all" => Some(ImportTag::ImportAll),
            "import.anchor" => Some(ImportTag::ImportAnchor),
            "import-all-parameterized" => Some(ImportTag::ImportAllParameterized),
            _ => None,
        }
    }

    /// The import tag on `node`, if it has one.
    pub fn of(node: &YamlNode) -> Option<Self> {
        node.tag.as_ref().and_then(Self::from_tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            ImportTag::Import => "!import",
            ImportTag::ImportAll => "!import-all",
            ImportTag::ImportAnchor => "!import.anchor",
            ImportTag::ImportAllParameterized => "!import-all-parameterized",
        }
    }
}

/// Split `path#anchor`. The anchor is everything after the last `#`.
pub fn parse_anchor_ref(value: &str) -> Option<(&str, &str)> {
    let (path, anchor) = value.rsplit_once('#')?;
    let (path, anchor) = (path.trim(), anchor.trim());
    (!path.is_empty() && !anchor.is_empty()).then_some((path, anchor))
}

impl ImportLoader {
    /// Resolve an import-tagged node to its value.
    pub(crate) fn construct_import(
        &mut self,
        tag: ImportTag,
        node: &YamlNode,
    ) -> Result<Yaml, ImportError> {
        let argument = import_argument(tag, node)?;
        let at = &node.source_info;

        match tag {
            ImportTag::Import => {
                let path = self.resolver().root().resolve(argument);
                self.load_path(&path, Some(at))
            }
            ImportTag::ImportAll => {
                let matches = self
                    .resolver_mut()
                    .resolve(argument)
                    .map_err(|e| e.with_location(at))?;
                let mut values = Vec::with_capacity(matches.len());
                for m in &matches {
                    values.push(self.load_path(&m.path, Some(at))?);
                }
                Ok(Yaml::Array(values))
            }
            ImportTag::ImportAnchor => {
                let (path, anchor) =
                    parse_anchor_ref(argument).ok_or_else(|| ImportError::MalformedReference {
                        tag: tag.name(),
                        value: argument.to_string(),
                        reason: "expected 'path#anchor'",
                        location: at.clone(),
                    })?;
                let path = self.resolver().root().resolve(path);
                self.load_anchor(&path, anchor, Some(at))
            }
            ImportTag::ImportAllParameterized => {
                let matches = self
                    .resolver_mut()
                    .resolve(argument)
                    .map_err(|e| e.with_location(at))?;
                let mut values = Vec::with_capacity(matches.len());
                for m in matches {
                    let mut hash = match self.load_path(&m.path, Some(at))? {
                        Yaml::Hash(hash) => hash,
                        Yaml::Null => Hash::new(),
                        other => {
                            return Err(ImportError::ParameterizedNotMapping {
                                path: m.path,
                                found: value_kind_name(&other),
                                location: at.clone(),
                            });
                        }
                    };
                    for (name, value) in m.captures {
                        set_keeping_position(&mut hash, Yaml::String(name), Yaml::String(value));
                    }
                    values.push(Yaml::Hash(hash));
                }
                Ok(Yaml::Array(values))
            }
        }
    }
}

/// The scalar text an import tag operates on.
fn import_argument(tag: ImportTag, node: &YamlNode) -> Result<&str, ImportError> {
    let Some(value) = node.as_scalar_str() else {
        return Err(ImportError::TagOnNonScalar {
            tag: tag.name(),
            kind: node.kind_name(),
            location: node.source_info.clone(),
        });
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(ImportError::MalformedReference {
            tag: tag.name(),
            value: String::new(),
            reason: "expected a path",
            location: node.source_info.clone(),
        });
    }
    Ok(value)
}
