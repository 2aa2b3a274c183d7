//! Source context for managing files

use crate::source_info::SourceInfo;
use crate::types::{FileId, Location};
use serde::{Deserialize, Serialize};

/// Context for managing source files
///
/// Every file parsed during a load is registered here so that locations
/// carried by errors can be turned back into `path:line:column` and source
/// snippets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file with content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier
    pub path: String,
    /// File content
    ///
    /// When None, content is read from disk using the path when needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceFile {
    /// Get the file content, reading from disk for disk-backed files
    pub fn read_content(&self) -> Option<String> {
        match &self.content {
            Some(c) => Some(c.clone()),
            None => std::fs::read_to_string(&self.path).ok(),
        }
    }
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Add a file to the context and return its ID
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile { path, content });
        id
    }

    /// Get a file by ID
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    /// Number of registered files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Map the start of a location to its file path and row/column
    pub fn resolve_start(&self, info: &SourceInfo) -> Option<(&str, Location)> {
        let file = self.get_file(info.file_id)?;
        let content = file.read_content()?;
        let location = crate::utils::offset_to_location(&content, info.start_offset())?;
        Some((file.path.as_str(), location))
    }

    /// Format a location as `path:line:column` (1-based), if it can be resolved
    pub fn describe(&self, info: &SourceInfo) -> Option<String> {
        let (path, location) = self.resolve_start(info)?;
        Some(format!(
            "{}:{}:{}",
            path,
            location.row + 1,
            location.column + 1
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = SourceContext::new();
        assert!(ctx.get_file(FileId(0)).is_none());
        assert_eq!(ctx.file_count(), 0);
    }

    #[test]
    fn test_multiple_files() {
        let mut ctx = SourceContext::new();
        let id1 = ctx.add_file("first.yml".to_string(), Some("a: 1".to_string()));
        let id2 = ctx.add_file("second.yml".to_string(), Some("b: 2".to_string()));

        assert_eq!(id1, FileId(0));
        assert_eq!(id2, FileId(1));
        assert_eq!(ctx.get_file(id2).unwrap().path, "second.yml");
    }

    #[test]
    fn test_describe() {
        let mut ctx = SourceContext::new();
        let id = ctx.add_file(
            "doc.yml".to_string(),
            Some("a: 1\nb: !import x.yml\n".to_string()),
        );
        let info = SourceInfo::from_offsets(id, 8, 14);
        assert_eq!(ctx.describe(&info).as_deref(), Some("doc.yml:2:4"));
    }

    #[test]
    fn test_describe_unknown_file() {
        let ctx = SourceContext::new();
        let info = SourceInfo::from_offsets(FileId(4), 0, 1);
        assert!(ctx.describe(&info).is_none());
    }
}
