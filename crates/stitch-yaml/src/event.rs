//! YAML events with anchor names, tags and source locations.
//!
//! yaml-rust2 identifies anchors by a numeric id that is assigned in document
//! order, one fresh id per `&name` occurrence. The names themselves are only
//! visible in the scanner's token stream, so [`parse_events`] pairs the two:
//! the n-th new anchor id in the event stream belongs to the n-th `Anchor`
//! token.

use crate::{Error, Result, SourceInfo};
use std::collections::HashMap;
use std::fmt;
use stitch_source_map::{FileId, Location};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, Scanner, TScalarStyle, Token, TokenType};

/// A tag attached to a node, split the way the YAML scanner reports it.
///
/// `!import` has handle `!` and suffix `import`; `!!str` has the core schema
/// handle and suffix `str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct YamlTag {
    pub handle: String,
    pub suffix: String,
}

const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

impl YamlTag {
    pub fn new(handle: impl Into<String>, suffix: impl Into<String>) -> Self {
        YamlTag {
            handle: handle.into(),
            suffix: suffix.into(),
        }
    }

    /// A local tag such as `!import`.
    pub fn local(suffix: impl Into<String>) -> Self {
        YamlTag::new("!", suffix)
    }

    /// True for `!name`.
    pub fn is_local(&self, name: &str) -> bool {
        self.handle == "!" && self.suffix == name
    }

    /// True for tags from the YAML core schema (`!!str`, `!!merge`, ...).
    pub fn is_core(&self) -> bool {
        self.handle == "!!" || self.handle == CORE_SCHEMA_PREFIX
    }
}

impl fmt::Display for YamlTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core() {
            write!(f, "!!{}", self.suffix)
        } else {
            write!(f, "{}{}", self.handle, self.suffix)
        }
    }
}

impl From<Tag> for YamlTag {
    fn from(tag: Tag) -> Self {
        YamlTag {
            handle: tag.handle,
            suffix: tag.suffix,
        }
    }
}

/// Presentation style of a scalar.
///
/// Only plain scalars go through type resolution; every quoted or block
/// scalar is a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl From<TScalarStyle> for ScalarStyle {
    fn from(style: TScalarStyle) -> Self {
        match style {
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
            _ => ScalarStyle::Plain,
        }
    }
}

/// A parse event.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlEvent {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias {
        anchor: String,
    },
    Scalar {
        value: String,
        style: ScalarStyle,
        anchor: Option<String>,
        tag: Option<YamlTag>,
    },
    SequenceStart {
        anchor: Option<String>,
        tag: Option<YamlTag>,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<String>,
        tag: Option<YamlTag>,
    },
    MappingEnd,
}

impl YamlEvent {
    /// The anchor defined by this event, if any.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            YamlEvent::Scalar { anchor, .. }
            | YamlEvent::SequenceStart { anchor, .. }
            | YamlEvent::MappingStart { anchor, .. } => anchor.as_deref(),
            _ => None,
        }
    }

    pub fn is_collection_start(&self) -> bool {
        matches!(
            self,
            YamlEvent::SequenceStart { .. } | YamlEvent::MappingStart { .. }
        )
    }

    pub fn is_collection_end(&self) -> bool {
        matches!(self, YamlEvent::SequenceEnd | YamlEvent::MappingEnd)
    }
}

/// An event together with where it starts in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedEvent {
    pub event: YamlEvent,
    pub source_info: SourceInfo,
}

struct EventCollector {
    events: Vec<(Event, Marker)>,
}

impl MarkedEventReceiver for EventCollector {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        self.events.push((ev, marker));
    }
}

fn location_of(marker: &Marker) -> Location {
    Location {
        offset: marker.index(),
        row: marker.line().saturating_sub(1),
        column: marker.col(),
    }
}

fn syntax_error(err: yaml_rust2::ScanError, content: &str, file_id: FileId) -> Error {
    let start = location_of(err.marker());
    // The parser rejects `*name` before any anchor `&name` is seen; report it
    // as an undefined alias rather than a syntax problem.
    if err.info().contains("unknown anchor") {
        if let Some(name) = alias_name_at(content, start.offset) {
            let len = name.chars().count() + 1;
            return Error::UnknownAlias {
                name,
                location: SourceInfo::starting_at(file_id, start, len),
            };
        }
    }
    Error::Syntax {
        message: err.to_string(),
        location: Some(SourceInfo::starting_at(file_id, start, 1)),
    }
}

/// The alias name following a `*` at character offset `offset`.
fn alias_name_at(content: &str, offset: usize) -> Option<String> {
    let mut chars = content.chars().skip(offset);
    if chars.next() != Some('*') {
        return None;
    }
    let name: String = chars
        .take_while(|c| !c.is_whitespace() && !matches!(c, ',' | '[' | ']' | '{' | '}'))
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Anchor names in the order the scanner sees them.
fn scan_anchor_names(content: &str) -> Vec<String> {
    Scanner::new(content.chars())
        .filter_map(|Token(_, token)| match token {
            TokenType::Anchor(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Parse the first YAML document in `content` into marked events.
///
/// Locations are attributed to `file_id`.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the input is not valid YAML.
pub fn parse_events(content: &str, file_id: FileId) -> Result<Vec<MarkedEvent>> {
    let mut parser = Parser::new_from_str(content);
    let mut collector = EventCollector { events: Vec::new() };
    parser
        .load(&mut collector, false)
        .map_err(|e| syntax_error(e, content, file_id))?;

    let mut scanned_names = scan_anchor_names(content).into_iter();
    let mut names: HashMap<usize, String> = HashMap::new();
    let mut name_for = |id: usize| -> Option<String> {
        if id == 0 {
            return None;
        }
        let name = names
            .entry(id)
            .or_insert_with(|| scanned_names.next().unwrap_or_else(|| format!("#{id}")));
        Some(name.clone())
    };

    let mut events = Vec::with_capacity(collector.events.len());
    for (ev, marker) in collector.events {
        let start = location_of(&marker);
        let (event, len) = match ev {
            Event::Nothing => continue,
            Event::StreamStart => (YamlEvent::StreamStart, 0),
            Event::StreamEnd => (YamlEvent::StreamEnd, 0),
            Event::DocumentStart { .. } => (YamlEvent::DocumentStart, 0),
            Event::DocumentEnd => (YamlEvent::DocumentEnd, 0),
            Event::Alias(id) => {
                let anchor = name_for(id).unwrap_or_default();
                let len = anchor.chars().count() + 1;
                (YamlEvent::Alias { anchor }, len)
            }
            Event::Scalar(value, style, id, tag) => {
                let len = value.chars().count();
                let event = YamlEvent::Scalar {
                    value,
                    style: style.into(),
                    anchor: name_for(id),
                    tag: tag.map(YamlTag::from),
                };
                (event, len)
            }
            Event::SequenceStart(id, tag) => (
                YamlEvent::SequenceStart {
                    anchor: name_for(id),
                    tag: tag.map(YamlTag::from),
                },
                0,
            ),
            Event::SequenceEnd => (YamlEvent::SequenceEnd, 0),
            Event::MappingStart(id, tag) => (
                YamlEvent::MappingStart {
                    anchor: name_for(id),
                    tag: tag.map(YamlTag::from),
                },
                0,
            ),
            Event::MappingEnd => (YamlEvent::MappingEnd, 0),
        };
        events.push(MarkedEvent {
            event,
            source_info: SourceInfo::starting_at(file_id, start, len),
        });
    }

    Ok(events)
}
