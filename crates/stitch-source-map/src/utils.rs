//! Utility functions for working with source positions

use crate::types::{Location, Range};

/// Convert a character offset to a Location with line and column info
///
/// Returns None if the offset is past the end of the source.
pub fn offset_to_location(source: &str, offset: usize) -> Option<Location> {
    let mut row = 0;
    let mut column = 0;
    let mut seen = 0;

    for ch in source.chars() {
        if seen == offset {
            break;
        }
        if ch == '\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
        seen += 1;
    }

    if seen < offset {
        return None;
    }

    Some(Location {
        offset,
        row,
        column,
    })
}

/// Create a Range from start and end character offsets
///
/// Row and column are left at 0. Use `offset_to_location` to get full
/// Location info.
pub fn range_from_offsets(start: usize, end: usize) -> Range {
    Range {
        start: Location {
            offset: start,
            row: 0,
            column: 0,
        },
        end: Location {
            offset: end,
            row: 0,
            column: 0,
        },
    }
}
