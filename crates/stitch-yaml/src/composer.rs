//! Assemble marked events into a node tree.

use crate::event::{MarkedEvent, YamlEvent, YamlTag};
use crate::node::{NodeKind, YamlNode};
use crate::{Error, Result, SourceInfo};
use std::collections::HashMap;

/// Upper bound on the number of nodes alias expansion may copy into one tree.
pub const MAX_ALIAS_EXPANSION: usize = 100_000;

/// Compose a node tree from a slice of events.
///
/// Stream and document markers are skipped, so the slice may be a complete
/// stream or any well-nested fragment of one (such as a single anchored
/// subtree). Aliases are expanded by copying the anchored node; an alias to
/// an anchor that is not defined earlier in the slice is an error.
///
/// A slice without any node composes to a null scalar.
///
/// Aliases may add at most [`MAX_ALIAS_EXPANSION`] nodes to the tree, which
/// stops nested alias lists from growing it exponentially.
///
/// # Errors
///
/// Returns [`Error::UnknownAlias`] for undefined aliases,
/// [`Error::AliasExpansionLimit`] when aliases expand past the limit, and
/// [`Error::Syntax`] if the slice is not well nested.
pub fn compose(events: &[MarkedEvent]) -> Result<YamlNode> {
    let mut composer = Composer::default();
    for marked in events {
        composer.on_event(marked)?;
    }
    composer.finish(events.first().map(|e| e.source_info.clone()))
}

/// A collection being built.
enum BuildNode {
    Sequence {
        start: SourceInfo,
        anchor: Option<String>,
        tag: Option<YamlTag>,
        items: Vec<YamlNode>,
    },
    Mapping {
        start: SourceInfo,
        anchor: Option<String>,
        tag: Option<YamlTag>,
        entries: Vec<(YamlNode, Option<YamlNode>)>,
    },
}

#[derive(Default)]
struct Composer {
    /// Anchored nodes with their node counts
    anchors: HashMap<String, (YamlNode, usize)>,
    expanded: usize,
    stack: Vec<BuildNode>,
    root: Option<YamlNode>,
}

impl Composer {
    fn on_event(&mut self, marked: &MarkedEvent) -> Result<()> {
        let source_info = marked.source_info.clone();
        match &marked.event {
            YamlEvent::StreamStart
            | YamlEvent::StreamEnd
            | YamlEvent::DocumentStart
            | YamlEvent::DocumentEnd => {}

            YamlEvent::Scalar {
                value,
                style,
                anchor,
                tag,
            } => {
                let node = YamlNode {
                    kind: NodeKind::Scalar {
                        value: value.clone(),
                        style: *style,
                    },
                    tag: tag.clone(),
                    anchor: anchor.clone(),
                    source_info,
                };
                self.complete(node)?;
            }

            YamlEvent::Alias { anchor } => {
                let Some((node, size)) = self.anchors.get(anchor) else {
                    return Err(Error::UnknownAlias {
                        name: anchor.clone(),
                        location: source_info,
                    });
                };
                self.expanded += size;
                if self.expanded > MAX_ALIAS_EXPANSION {
                    return Err(Error::AliasExpansionLimit {
                        limit: MAX_ALIAS_EXPANSION,
                        location: source_info,
                    });
                }
                let node = node.clone();
                self.push(node)?;
            }

            YamlEvent::SequenceStart { anchor, tag } => {
                self.stack.push(BuildNode::Sequence {
                    start: source_info,
                    anchor: anchor.clone(),
                    tag: tag.clone(),
                    items: Vec::new(),
                });
            }

            YamlEvent::MappingStart { anchor, tag } => {
                self.stack.push(BuildNode::Mapping {
                    start: source_info,
                    anchor: anchor.clone(),
                    tag: tag.clone(),
                    entries: Vec::new(),
                });
            }

            YamlEvent::SequenceEnd => match self.stack.pop() {
                Some(BuildNode::Sequence {
                    start,
                    anchor,
                    tag,
                    items,
                }) => {
                    let node = YamlNode {
                        kind: NodeKind::Sequence(items),
                        tag,
                        anchor,
                        source_info: start.span_to(&source_info),
                    };
                    self.complete(node)?;
                }
                _ => return Err(unbalanced("sequence end", source_info)),
            },

            YamlEvent::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Mapping {
                    start,
                    anchor,
                    tag,
                    entries,
                }) => {
                    let mut pairs = Vec::with_capacity(entries.len());
                    for (key, value) in entries {
                        let value = match value {
                            Some(value) => value,
                            None => {
                                return Err(unbalanced("mapping key without value", key.source_info));
                            }
                        };
                        pairs.push((key, value));
                    }
                    let node = YamlNode {
                        kind: NodeKind::Mapping(pairs),
                        tag,
                        anchor,
                        source_info: start.span_to(&source_info),
                    };
                    self.complete(node)?;
                }
                _ => return Err(unbalanced("mapping end", source_info)),
            },
        }
        Ok(())
    }

    /// Register the node's anchor, then attach it to its parent.
    fn complete(&mut self, node: YamlNode) -> Result<()> {
        if let Some(anchor) = &node.anchor {
            self.anchors
                .insert(anchor.clone(), (node.clone(), node_count(&node)));
        }
        self.push(node)
    }

    fn push(&mut self, node: YamlNode) -> Result<()> {
        match self.stack.last_mut() {
            None => {
                // Only the first root counts; the parser stops after one document
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => {
                if let Some((_, value)) = entries.last_mut() {
                    if value.is_none() {
                        *value = Some(node);
                        return Ok(());
                    }
                }
                // This is a new key
                entries.push((node, None));
            }
        }
        Ok(())
    }

    fn finish(self, first: Option<SourceInfo>) -> Result<YamlNode> {
        if let Some(open) = self.stack.last() {
            let start = match open {
                BuildNode::Sequence { start, .. } | BuildNode::Mapping { start, .. } => start,
            };
            return Err(unbalanced("unterminated collection", start.clone()));
        }
        Ok(self
            .root
            .unwrap_or_else(|| YamlNode::plain_scalar("~", first.unwrap_or_default())))
    }
}

fn node_count(node: &YamlNode) -> usize {
    match &node.kind {
        NodeKind::Scalar { .. } => 1,
        NodeKind::Sequence(items) => 1 + items.iter().map(node_count).sum::<usize>(),
        NodeKind::Mapping(entries) => {
            1 + entries
                .iter()
                .map(|(k, v)| node_count(k) + node_count(v))
                .sum::<usize>()
        }
    }
}

fn unbalanced(what: &str, location: SourceInfo) -> Error {
    Error::Syntax {
        message: format!("malformed event stream: {}", what),
        location: Some(location),
    }
}
