//! # Tree Discovery
//!
//! Walks a remote folder hierarchy and returns every allow-listed document
//! below a root folder, each tagged with its slash-joined path.
//!
//! ## Ordering
//!
//! At every level, the subtrees of child folders come first (in listing
//! order), followed by the documents directly inside the folder. So for any
//! folder `F`:
//!
//! ```text
//! traverse(F) == traverse(child_1) ++ ... ++ traverse(child_n) ++ documents(F)
//! ```
//!
//! Calls are awaited one after another; there is no fan-out across sibling
//! folders.
//!
//! ## Failure policy
//!
//! Any listing failure aborts the whole traversal. Retrying transient
//! failures is the storage provider's job.

use bridge_traits::storage::{ContentType, DocumentType, ListRequest, RemoteFile, StorageProvider};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{LibraryError, Result};
use crate::models::{join_path, DriveEntry};

/// Default limit on folder nesting below the root.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Discovers documents beneath a root folder.
///
/// # Example
///
/// ```ignore
/// let discoverer = TreeDiscoverer::new(provider, vec![DocumentType::GoogleDoc]);
/// let entries = discoverer.traverse(&root_folder_id).await?;
/// let tree = FolderTree::from_entries(&entries);
/// ```
pub struct TreeDiscoverer {
    provider: Arc<dyn StorageProvider>,
    document_types: Vec<DocumentType>,
    max_depth: usize,
}

impl TreeDiscoverer {
    pub fn new(provider: Arc<dyn StorageProvider>, document_types: Vec<DocumentType>) -> Self {
        Self {
            provider,
            document_types,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Maximum folder nesting below the root before traversal fails.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn document_types(&self) -> &[DocumentType] {
        &self.document_types
    }

    /// All non-trashed child folders of `parent_id`, across every page.
    pub async fn list_folders(&self, parent_id: &str) -> Result<Vec<RemoteFile>> {
        let files = self.list_all(ListRequest::folders(parent_id)).await?;
        Ok(files
            .into_iter()
            .filter(|f| f.content_type() == ContentType::Folder)
            .collect())
    }

    /// All non-trashed child documents of `parent_id` whose type is in the
    /// allow-list, across every page.
    ///
    /// Classification is by exact MIME equality; anything else the remote
    /// returns is dropped.
    pub async fn list_documents(&self, parent_id: &str) -> Result<Vec<RemoteFile>> {
        if self.document_types.is_empty() {
            return Ok(Vec::new());
        }

        let files = self
            .list_all(ListRequest::documents(parent_id, self.document_types.clone()))
            .await?;

        Ok(files
            .into_iter()
            .filter(|f| match f.content_type() {
                ContentType::Document(t) => self.document_types.contains(&t),
                _ => false,
            })
            .collect())
    }

    async fn list_all(&self, request: ListRequest) -> Result<Vec<RemoteFile>> {
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0;

        loop {
            page_count += 1;
            debug!(
                parent_id = %request.parent_id,
                page = page_count,
                "Fetching child page"
            );

            let page = self
                .provider
                .list_children(&request.clone().with_page_token(page_token.take()))
                .await?;

            all_files.extend(page.files);

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_files)
    }

    /// Discover every allow-listed document beneath `root_id`.
    ///
    /// Paths are relative to the root: a document directly inside it has
    /// its own name as path.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Bridge`] when any listing call fails
    /// - [`LibraryError::DepthExceeded`] when nesting goes past the limit
    #[instrument(skip(self), fields(max_depth = self.max_depth))]
    pub async fn traverse(&self, root_id: &str) -> Result<Vec<DriveEntry>> {
        if root_id.trim().is_empty() {
            return Err(LibraryError::InvalidInput {
                field: "root_id".to_string(),
                message: "Root folder id must not be empty".to_string(),
            });
        }

        let entries = self
            .traverse_folder(root_id.to_string(), String::new(), vec![root_id.to_string()])
            .await?;

        info!(documents = entries.len(), "Traversal complete");
        Ok(entries)
    }

    /// `ancestors` holds the ids from the root down to `folder_id` inclusive.
    fn traverse_folder(
        &self,
        folder_id: String,
        prefix: String,
        ancestors: Vec<String>,
    ) -> BoxFuture<'_, Result<Vec<DriveEntry>>> {
        async move {
            let mut entries = Vec::new();

            for folder in self.list_folders(&folder_id).await? {
                let folder_path = join_path(&prefix, &folder.name);

                if ancestors.contains(&folder.id) {
                    warn!(
                        folder_id = %folder.id,
                        "Folder is its own ancestor, skipping cycle"
                    );
                    continue;
                }

                // The root sits at depth 0, its children at depth 1.
                if ancestors.len() > self.max_depth {
                    return Err(LibraryError::DepthExceeded {
                        max_depth: self.max_depth,
                        path: folder_path,
                    });
                }

                let mut child_ancestors = ancestors.clone();
                child_ancestors.push(folder.id.clone());

                let nested = self
                    .traverse_folder(folder.id, folder_path, child_ancestors)
                    .await?;
                entries.extend(nested);
            }

            let documents = self.list_documents(&folder_id).await?;
            debug!(
                folder_id = %folder_id,
                documents = documents.len(),
                "Listed folder documents"
            );

            entries.extend(
                documents
                    .into_iter()
                    .map(|file| DriveEntry::from_remote(file, &prefix)),
            );

            Ok(entries)
        }
        .boxed()
    }
}
