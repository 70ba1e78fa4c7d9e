//! Domain models for the document shelf
//!
//! Entries are produced by one traversal and never mutated afterwards.

use bridge_traits::storage::{ContentType, DocumentType, RemoteFile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path separator used when joining folder names.
pub const PATH_SEPARATOR: char = '/';

/// Whether an entry is a folder or a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    Document,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Folder => write!(f, "folder"),
            EntryKind::Document => write!(f, "document"),
        }
    }
}

/// One item found during traversal.
///
/// `path` joins the human-readable names of every ancestor folder below the
/// root with the entry's own name, so siblings with equal names share a
/// path. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEntry {
    pub name: String,
    pub id: String,
    pub path: String,
    pub kind: EntryKind,
    pub content_type: ContentType,
}

impl DriveEntry {
    /// Build an entry from a listed file and the path of its parent folder.
    ///
    /// An empty `prefix` means the file sits directly under the root.
    pub fn from_remote(file: RemoteFile, prefix: &str) -> Self {
        let content_type = file.content_type();
        let kind = match content_type {
            ContentType::Folder => EntryKind::Folder,
            _ => EntryKind::Document,
        };

        Self {
            path: join_path(prefix, &file.name),
            name: file.name,
            id: file.id,
            kind,
            content_type,
        }
    }

    pub fn is_document(&self) -> bool {
        self.kind == EntryKind::Document
    }

    /// The document type, when the entry classifies as a known one.
    pub fn document_type(&self) -> Option<DocumentType> {
        match self.content_type {
            ContentType::Document(document_type) => Some(document_type),
            _ => None,
        }
    }

    /// The raw MIME tag.
    pub fn mime_type(&self) -> &str {
        self.content_type.mime_type()
    }
}

/// `prefix/name`, or `name` when `prefix` is empty.
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, name)
    }
}
