/*
 * anchor.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Extraction of a single anchored subtree from an event stream.
 */

use crate::ImportError;
use std::path::Path;
use stitch_yaml::MarkedEvent;

/// Return the events that make up the node anchored as `&anchor`.
///
/// A scalar anchor yields its single event. A mapping or sequence anchor
/// yields its start event through the matching end event. When the name is
/// defined more than once, the first definition wins.
///
/// Anchors are looked up on events rather than constructed values because
/// construction has already replaced aliases by their targets and forgotten
/// the names.
///
/// # Errors
///
/// [`ImportError::AnchorNotFound`] naming `anchor` and `source` when no event
/// defines the anchor.
pub fn extract_anchor<'e>(
    events: &'e [MarkedEvent],
    anchor: &str,
    source: &Path,
) -> Result<&'e [MarkedEvent], ImportError> {
    let not_found = || ImportError::AnchorNotFound {
        anchor: anchor.to_string(),
        path: source.to_path_buf(),
        location: None,
    };

    let start = events
        .iter()
        .position(|e| e.event.anchor() == Some(anchor))
        .ok_or_else(not_found)?;

    if !events[start].event.is_collection_start() {
        return Ok(&events[start..=start]);
    }

    let mut depth = 0usize;
    for (offset, marked) in events[start..].iter().enumerate() {
        if marked.event.is_collection_start() {
            depth += 1;
        } else if marked.event.is_collection_end() {
            depth -= 1;
            if depth == 0 {
                return Ok(&events[start..=start + offset]);
            }
        }
    }

    Err(stitch_yaml::Error::Syntax {
        message: format!("unterminated node for anchor '&{anchor}'"),
        location: Some(events[start].source_info.clone()),
    }
    .into())
}
