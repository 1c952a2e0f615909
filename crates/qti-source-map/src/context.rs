//! Registry of source files referenced by [`FileId`]

use crate::types::FileId;
use serde::{Deserialize, Serialize};

/// Context for managing source files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file with optional in-memory content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier
    pub path: String,
    /// File content. When `None`, renderers fall back to plain messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the context and return its ID.
    ///
    /// When `content` is `None` the file is read from disk; a failed read
    /// leaves the file without content.
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());
        let content = content.or_else(|| std::fs::read_to_string(&path).ok());
        self.files.push(SourceFile { path, content });
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
