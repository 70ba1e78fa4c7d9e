//! Remote Storage Abstractions
//!
//! The contract between the core and a remote file-storage collaborator:
//! child listing by parent with a type filter, one page at a time, and
//! document download. Content types are a closed set so routing on them is
//! checked exhaustively at compile time.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// MIME tag used by the remote service for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// MIME type a native document is exported to before rendering.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document types the shelf knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Native cloud document (`application/vnd.google-apps.document`)
    GoogleDoc,
    /// Office Open XML word-processing document (`.docx`)
    WordOpenXml,
    /// Legacy binary Word document (`.doc`)
    WordLegacy,
    /// Portable Document Format
    Pdf,
}

/// How a document's displayable content is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Export through the remote service into `mime_type`, then render.
    Export { mime_type: &'static str },
    /// Download the raw bytes and render them.
    Media,
    /// Not rendered; hosts show a preview link instead.
    PreviewOnly,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::GoogleDoc,
        DocumentType::WordOpenXml,
        DocumentType::WordLegacy,
        DocumentType::Pdf,
    ];

    /// Exact MIME tag the remote service reports for this type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentType::GoogleDoc => "application/vnd.google-apps.document",
            DocumentType::WordOpenXml => DOCX_MIME_TYPE,
            DocumentType::WordLegacy => "application/msword",
            DocumentType::Pdf => "application/pdf",
        }
    }

    /// Classify a MIME tag by exact equality.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|document_type| document_type.mime_type() == mime_type)
    }

    /// Short configuration key (`google_doc`, `docx`, `doc`, `pdf`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::GoogleDoc => "google_doc",
            DocumentType::WordOpenXml => "docx",
            DocumentType::WordLegacy => "doc",
            DocumentType::Pdf => "pdf",
        }
    }

    /// Parse a configuration key. Accepts a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "google_doc" | "googledoc" | "gdoc" => Some(DocumentType::GoogleDoc),
            "docx" | "word_open_xml" => Some(DocumentType::WordOpenXml),
            "doc" | "word_legacy" => Some(DocumentType::WordLegacy),
            "pdf" => Some(DocumentType::Pdf),
            _ => None,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        match self {
            DocumentType::GoogleDoc => RenderMode::Export {
                mime_type: DOCX_MIME_TYPE,
            },
            DocumentType::WordOpenXml => RenderMode::Media,
            DocumentType::WordLegacy | DocumentType::Pdf => RenderMode::PreviewOnly,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a remote item's MIME tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Folder,
    Document(DocumentType),
    /// Anything else, carrying the original tag.
    Unsupported(String),
}

impl ContentType {
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type == FOLDER_MIME_TYPE {
            return ContentType::Folder;
        }
        match DocumentType::from_mime_type(mime_type) {
            Some(document_type) => ContentType::Document(document_type),
            None => ContentType::Unsupported(mime_type.to_string()),
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ContentType::Folder => FOLDER_MIME_TYPE,
            ContentType::Document(document_type) => document_type.mime_type(),
            ContentType::Unsupported(mime_type) => mime_type,
        }
    }
}

/// A single child item as reported by the remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

impl RemoteFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn content_type(&self) -> ContentType {
        ContentType::from_mime_type(&self.mime_type)
    }
}

/// Which children of a parent a listing call asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildFilter {
    /// Non-trashed folders.
    Folders,
    /// Non-trashed documents whose MIME tag is one of these types.
    Documents(Vec<DocumentType>),
}

/// One page of a child listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub parent_id: String,
    pub filter: ChildFilter,
    /// Continuation token from the previous page, if any.
    pub page_token: Option<String>,
}

impl ListRequest {
    pub fn folders(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            filter: ChildFilter::Folders,
            page_token: None,
        }
    }

    pub fn documents(parent_id: impl Into<String>, types: Vec<DocumentType>) -> Self {
        Self {
            parent_id: parent_id.into(),
            filter: ChildFilter::Documents(types),
            page_token: None,
        }
    }

    pub fn with_page_token(mut self, page_token: Option<String>) -> Self {
        self.page_token = page_token;
        self
    }
}

/// Result of one listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub files: Vec<RemoteFile>,
    /// Present when more results remain.
    pub next_page_token: Option<String>,
}

/// Remote listing and download collaborator.
///
/// Implementations must be safe to reuse across calls: they hold
/// credentials and transport, never traversal state.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::{ListRequest, StorageProvider};
///
/// async fn first_page(provider: &dyn StorageProvider, root: &str) -> Result<usize> {
///     let page = provider.list_children(&ListRequest::folders(root)).await?;
///     Ok(page.files.len())
/// }
/// ```
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// List one page of children of `request.parent_id`.
    async fn list_children(&self, request: &ListRequest) -> Result<ListPage>;

    /// Fetch renderable bytes for a document.
    ///
    /// Native documents are exported to `.docx`; binary documents are
    /// downloaded as-is. Preview-only types return
    /// [`BridgeError::NotAvailable`](crate::error::BridgeError::NotAvailable).
    async fn download(&self, file_id: &str, document_type: DocumentType) -> Result<Bytes>;

    /// Browser preview link used when content is not rendered natively.
    fn preview_url(&self, file_id: &str, document_type: DocumentType) -> String;
}
