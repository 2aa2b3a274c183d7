//! Source information attached to composed nodes

use crate::types::{FileId, Location, Range};
use serde::{Deserialize, Serialize};

/// A range inside one registered source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// The file this range belongs to
    pub file_id: FileId,
    /// The range in that file
    pub range: Range,
}

impl Default for SourceInfo {
    fn default() -> Self {
        SourceInfo::from_offsets(FileId(0), 0, 0)
    }
}

impl SourceInfo {
    /// Create source info for a range in a file
    pub fn original(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }

    /// Create source info from character offsets (row and column left at 0)
    pub fn from_offsets(file_id: FileId, start: usize, end: usize) -> Self {
        SourceInfo {
            file_id,
            range: crate::utils::range_from_offsets(start, end),
        }
    }

    /// Create source info for `len` characters starting at `start`
    pub fn starting_at(file_id: FileId, start: Location, len: usize) -> Self {
        let end = Location {
            offset: start.offset + len,
            row: start.row,
            column: start.column + len,
        };
        SourceInfo {
            file_id,
            range: Range { start, end },
        }
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    /// Smallest range covering both `self` and `other`.
    ///
    /// Only meaningful for locations in the same file; when the files differ
    /// `self` is returned unchanged.
    pub fn span_to(&self, other: &SourceInfo) -> SourceInfo {
        if self.file_id != other.file_id {
            return self.clone();
        }
        let start = self.range.start.min(other.range.start);
        let end = self.range.end.max(other.range.end);
        SourceInfo {
            file_id: self.file_id,
            range: Range { start, end },
        }
    }
}
