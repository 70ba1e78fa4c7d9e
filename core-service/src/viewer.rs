//! Viewer façade
//!
//! Ties traversal, download and rendering together into the two calls a
//! display surface makes: load the tree once, open documents on demand.
//! Both calls turn failures into displayable outcomes; the `discover` and
//! `render_document` variants propagate them instead.

use std::sync::Arc;

use bridge_traits::{ContentType, DocumentType, RenderMode, StorageProvider};
use core_document::RenderedDocument;
use core_library::{DriveEntry, FolderTree, TreeDiscoverer};
use core_runtime::ViewerConfig;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{CoreError, Result};

/// Warning shown when the traversal succeeds but finds nothing.
pub const NO_DOCUMENTS_WARNING: &str = "No documents found";

/// Result of loading the folder tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeView {
    pub tree: FolderTree,
    pub document_count: usize,
    /// Set when the tree is empty, either because nothing matched or
    /// because the traversal failed.
    pub warning: Option<String>,
}

/// What to show for one opened document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentView {
    /// Inline HTML markup.
    Rendered { markup: String },
    /// Not rendered in-app. Known document types carry a preview link.
    Unsupported { preview_url: Option<String> },
    /// Error placeholder for a download or render failure.
    Failed { message: String },
}

pub struct ViewerService {
    provider: Arc<dyn StorageProvider>,
    discoverer: TreeDiscoverer,
    config: ViewerConfig,
}

impl ViewerService {
    pub fn new(provider: Arc<dyn StorageProvider>, config: ViewerConfig) -> Self {
        let discoverer =
            TreeDiscoverer::new(Arc::clone(&provider), config.document_types.clone())
                .with_max_depth(config.max_depth);

        Self {
            provider,
            discoverer,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Traverse the configured root folder.
    ///
    /// # Errors
    ///
    /// Any listing failure or an exceeded depth limit.
    #[instrument(skip(self), fields(root = %self.config.root_folder_id))]
    pub async fn discover(&self) -> Result<Vec<DriveEntry>> {
        Ok(self.discoverer.traverse(&self.config.root_folder_id).await?)
    }

    /// Traverse and group the result into a tree. Never fails.
    pub async fn load_tree(&self) -> TreeView {
        match self.discover().await {
            Ok(entries) if entries.is_empty() => {
                info!("Traversal found no documents");
                TreeView {
                    warning: Some(NO_DOCUMENTS_WARNING.to_string()),
                    ..TreeView::default()
                }
            }
            Ok(entries) => {
                let tree = FolderTree::from_entries(&entries);
                TreeView {
                    document_count: tree.document_count(),
                    tree,
                    warning: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Traversal failed, showing empty tree");
                TreeView {
                    warning: Some(format!("Could not load documents: {}", e)),
                    ..TreeView::default()
                }
            }
        }
    }

    /// Download and render one document.
    ///
    /// # Errors
    ///
    /// [`CoreError::Unsupported`] for folders, unclassified types, types
    /// outside the allow-list and preview-only types; otherwise the
    /// download or render failure.
    #[instrument(skip(self, entry), fields(id = %entry.id, name = %entry.name))]
    pub async fn render_document(&self, entry: &DriveEntry) -> Result<RenderedDocument> {
        let document_type = self.renderable_type(entry)?;
        let bytes = self.provider.download(&entry.id, document_type).await?;
        let rendered = core_document::render(&bytes)?;

        debug!(blocks = rendered.blocks.len(), "Document rendered");
        Ok(rendered)
    }

    /// Open a document for display. Never fails.
    pub async fn open_document(&self, entry: &DriveEntry) -> DocumentView {
        match self.render_document(entry).await {
            Ok(rendered) => DocumentView::Rendered {
                markup: rendered.to_html(),
            },
            Err(CoreError::Unsupported { mime_type }) => {
                debug!(mime_type = %mime_type, "Not rendered in-app");
                DocumentView::Unsupported {
                    preview_url: entry
                        .document_type()
                        .map(|document_type| self.provider.preview_url(&entry.id, document_type)),
                }
            }
            Err(e) => {
                warn!(id = %entry.id, error = %e, "Document could not be displayed");
                DocumentView::Failed {
                    message: format!("Could not display '{}': {}", entry.name, e),
                }
            }
        }
    }

    fn renderable_type(&self, entry: &DriveEntry) -> Result<DocumentType> {
        match &entry.content_type {
            ContentType::Document(document_type)
                if self.config.allows(*document_type)
                    && document_type.render_mode() != RenderMode::PreviewOnly =>
            {
                Ok(*document_type)
            }
            other => Err(CoreError::Unsupported {
                mime_type: other.mime_type().to_string(),
            }),
        }
    }
}
