//! Error types for YAML parsing and construction.

use crate::SourceInfo;
use thiserror::Error;

/// Result type alias for stitch-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, composing or constructing YAML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner or parser
    #[error("YAML syntax error: {message}")]
    Syntax {
        message: String,
        location: Option<SourceInfo>,
    },

    /// An alias that refers to an anchor which has not been defined
    #[error("found undefined alias '*{name}'")]
    UnknownAlias { name: String, location: SourceInfo },

    /// Aliases copied more nodes into the tree than allowed
    #[error("alias expansion exceeds the limit of {limit} nodes")]
    AliasExpansionLimit { limit: usize, location: SourceInfo },

    /// A merge key whose value cannot be merged
    #[error("expected a mapping or list of mappings for merging, but found {found}")]
    InvalidMergeValue {
        found: &'static str,
        location: SourceInfo,
    },

    /// A scalar that does not match the core type its tag requests
    #[error("cannot construct '{value}' as {tag}")]
    InvalidTypedScalar {
        value: String,
        tag: String,
        location: SourceInfo,
    },
}

impl Error {
    /// Source location of the offending node, when known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::Syntax { location, .. } => location.as_ref(),
            Error::UnknownAlias { location, .. }
            | Error::AliasExpansionLimit { location, .. }
            | Error::InvalidMergeValue { location, .. }
            | Error::InvalidTypedScalar { location, .. } => Some(location),
        }
    }
}
