//! Document loading
//!
//! The simulation never touches the filesystem directly. Pattern and level
//! documents are fetched by name through a [`DocumentLoader`], so tests and
//! tools can feed documents from memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SimError};

/// Kind of document being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pattern,
    Level,
}

impl DocumentKind {
    /// Subdirectory the document lives in
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocumentKind::Pattern => "patterns",
            DocumentKind::Level => "levels",
        }
    }
}

/// Source of raw document text
pub trait DocumentLoader {
    /// Fetch the raw text of a document. Missing documents surface as `NotFound`.
    fn load_document(&self, kind: DocumentKind, name: &str) -> Result<String>;
}

/// Reads `<root>/patterns/<name>.json` and `<root>/levels/<name>.json`
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path a document would be read from
    pub fn path_for(&self, kind: DocumentKind, name: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(format!("{name}.json"))
    }
}

impl DocumentLoader for DirectoryLoader {
    fn load_document(&self, kind: DocumentKind, name: &str) -> Result<String> {
        let path = self.path_for(kind, name);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SimError::NotFound {
                    name: name.to_string(),
                }
            } else {
                SimError::Io { path, source }
            }
        })
    }
}

/// In-memory documents, keyed by kind and name
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: HashMap<(DocumentKind, String), String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: DocumentKind, name: &str, text: impl Into<String>) {
        self.documents.insert((kind, name.to_string()), text.into());
    }

    /// Builder-style pattern insert
    pub fn with_pattern(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(DocumentKind::Pattern, name, text);
        self
    }

    /// Builder-style level insert
    pub fn with_level(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(DocumentKind::Level, name, text);
        self
    }
}

impl DocumentLoader for MemoryLoader {
    fn load_document(&self, kind: DocumentKind, name: &str) -> Result<String> {
        self.documents
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| SimError::NotFound {
                name: name.to_string(),
            })
    }
}
