/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Errors raised while resolving imports.
 */

use crate::pattern::PatternError;
use stitch_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use stitch_source_map::SourceInfo;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a document with import tags.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Parsing, composing or constructing YAML failed
    #[error(transparent)]
    Yaml(#[from] stitch_yaml::Error),

    #[error("{source}")]
    InvalidPattern {
        #[source]
        source: PatternError,
        location: Option<SourceInfo>,
    },

    #[error("failed to read directories for glob pattern '{pattern}': {source}")]
    Walk {
        pattern: String,
        #[source]
        source: io::Error,
    },

    #[error("imported file '{}' does not exist", path.display())]
    NotFound {
        path: PathBuf,
        location: Option<SourceInfo>,
    },

    #[error("failed to read imported file '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
        location: Option<SourceInfo>,
    },

    #[error("anchor '&{anchor}' not found in '{}'", path.display())]
    AnchorNotFound {
        anchor: String,
        path: PathBuf,
        location: Option<SourceInfo>,
    },

    #[error("{tag} expects a scalar, but was applied to a {kind}")]
    TagOnNonScalar {
        tag: &'static str,
        kind: &'static str,
        location: SourceInfo,
    },

    #[error("malformed {tag} value '{value}': {reason}")]
    MalformedReference {
        tag: &'static str,
        value: String,
        reason: &'static str,
        location: SourceInfo,
    },

    #[error("import cycle detected: {}", format_chain(chain))]
    ImportCycle {
        chain: Vec<PathBuf>,
        location: Option<SourceInfo>,
    },

    #[error("!import-all-parameterized expects '{}' to contain a mapping, but found {found}", path.display())]
    ParameterizedNotMapping {
        path: PathBuf,
        found: &'static str,
        location: SourceInfo,
    },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<PatternError> for ImportError {
    fn from(source: PatternError) -> Self {
        ImportError::InvalidPattern {
            source,
            location: None,
        }
    }
}

impl ImportError {
    /// Source location of the node that caused the error, when known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            ImportError::Yaml(err) => err.location(),
            ImportError::Walk { .. } => None,
            ImportError::InvalidPattern { location, .. }
            | ImportError::NotFound { location, .. }
            | ImportError::Unreadable { location, .. }
            | ImportError::AnchorNotFound { location, .. }
            | ImportError::ImportCycle { location, .. } => location.as_ref(),
            ImportError::TagOnNonScalar { location, .. }
            | ImportError::MalformedReference { location, .. }
            | ImportError::ParameterizedNotMapping { location, .. } => Some(location),
        }
    }

    /// Attach `at` as the location, unless one is already known.
    pub fn with_location(mut self, at: &SourceInfo) -> Self {
        match &mut self {
            ImportError::InvalidPattern { location, .. }
            | ImportError::NotFound { location, .. }
            | ImportError::Unreadable { location, .. }
            | ImportError::AnchorNotFound { location, .. }
            | ImportError::ImportCycle { location, .. } => {
                if location.is_none() {
                    *location = Some(at.clone());
                }
            }
            _ => {}
        }
        self
    }

    /// Stable diagnostic code from the error catalog.
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Yaml(err) => match err {
                stitch_yaml::Error::Syntax { .. } => "S-1-1",
                stitch_yaml::Error::UnknownAlias { .. } => "S-1-2",
                stitch_yaml::Error::InvalidMergeValue { .. } => "S-1-3",
                stitch_yaml::Error::InvalidTypedScalar { .. } => "S-1-4",
                stitch_yaml::Error::AliasExpansionLimit { .. } => "S-1-5",
            },
            ImportError::InvalidPattern { .. } => "S-2-1",
            ImportError::Walk { .. } => "S-2-2",
            ImportError::NotFound { .. } => "S-3-1",
            ImportError::Unreadable { .. } => "S-3-2",
            ImportError::AnchorNotFound { .. } => "S-3-3",
            ImportError::TagOnNonScalar { .. } => "S-3-4",
            ImportError::MalformedReference { .. } => "S-3-5",
            ImportError::ImportCycle { .. } => "S-3-6",
            ImportError::ParameterizedNotMapping { .. } => "S-3-7",
        }
    }

    /// Convert into a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let code = self.code();
        let title = get_error_info(code)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| "Import Error".to_string());

        let mut builder = DiagnosticMessageBuilder::error(title)
            .with_code(code)
            .problem(self.to_string())
            .with_optional_location(self.location().cloned());

        builder = match self {
            ImportError::NotFound { .. } => builder
                .add_hint("Relative import paths resolve against the import root, not the importing file?"),
            ImportError::AnchorNotFound { anchor, .. } => {
                builder.add_hint(format!("Define the anchor with `&{anchor}` in the target file?"))
            }
            ImportError::ImportCycle { chain, .. } => chain
                .iter()
                .fold(builder, |b, path| b.add_info(format!("imports {}", path.display()))),
            ImportError::InvalidPattern { .. } => builder.add_hint(
                "Named captures are written `{name:*}` for one path segment or `{name:**}` for any depth?",
            ),
            ImportError::TagOnNonScalar { .. } => {
                builder.add_hint("Write the import target as a plain string after the tag?")
            }
            ImportError::MalformedReference { tag: "!import.anchor", .. } => {
                builder.add_hint("Anchor imports are written `path/to/file.yml#anchor`?")
            }
            _ => builder,
        };

        builder.build()
    }
}
