//! Integration tests for tree discovery
//!
//! These tests run the discoverer against an in-memory drive and verify:
//! - Path construction and folder-first ordering
//! - The concatenation property across synthetic hierarchies
//! - Pagination across several pages
//! - Fatal propagation of a failing subfolder listing
//! - Depth limit and cycle handling

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    storage::{
        ChildFilter, DocumentType, ListPage, ListRequest, RemoteFile, StorageProvider,
        DOCX_MIME_TYPE, FOLDER_MIME_TYPE,
    },
};
use bytes::Bytes;
use core_library::{DriveEntry, FolderTree, LibraryError, TreeDiscoverer};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const GOOGLE_DOC: &str = "application/vnd.google-apps.document";

// ============================================================================
// Fake Drive
// ============================================================================

/// In-memory drive that serves children in insertion order, split into
/// pages of `page_size`.
struct FakeDrive {
    children: HashMap<String, Vec<RemoteFile>>,
    denied: HashSet<String>,
    page_size: usize,
    calls: AtomicUsize,
}

impl FakeDrive {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            denied: HashSet::new(),
            page_size: 100,
            calls: AtomicUsize::new(0),
        }
    }

    fn folder(mut self, parent: &str, id: &str, name: &str) -> Self {
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(RemoteFile::new(id, name, FOLDER_MIME_TYPE));
        self
    }

    fn file(mut self, parent: &str, id: &str, name: &str, mime: &str) -> Self {
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(RemoteFile::new(id, name, mime));
        self
    }

    fn deny(mut self, parent: &str) -> Self {
        self.denied.insert(parent.to_string());
        self
    }

    fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }
}

#[async_trait]
impl StorageProvider for FakeDrive {
    async fn list_children(&self, request: &ListRequest) -> BridgeResult<ListPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.denied.contains(&request.parent_id) {
            return Err(BridgeError::PermissionDenied(request.parent_id.clone()));
        }

        let matching: Vec<RemoteFile> = self
            .children
            .get(&request.parent_id)
            .map(|files| {
                files
                    .iter()
                    .filter(|f| match &request.filter {
                        ChildFilter::Folders => f.mime_type == FOLDER_MIME_TYPE,
                        ChildFilter::Documents(types) => {
                            types.iter().any(|t| t.mime_type() == f.mime_type)
                        }
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let offset: usize = request
            .page_token
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let end = (offset + self.page_size).min(matching.len());

        Ok(ListPage {
            files: matching[offset..end].to_vec(),
            next_page_token: (end < matching.len()).then(|| end.to_string()),
        })
    }

    async fn download(&self, _file_id: &str, _document_type: DocumentType) -> BridgeResult<Bytes> {
        Err(BridgeError::NotAvailable("download".to_string()))
    }

    fn preview_url(&self, file_id: &str, _document_type: DocumentType) -> String {
        format!("https://preview.invalid/{}", file_id)
    }
}

fn discoverer(drive: FakeDrive) -> TreeDiscoverer {
    TreeDiscoverer::new(
        Arc::new(drive),
        vec![
            DocumentType::GoogleDoc,
            DocumentType::WordOpenXml,
            DocumentType::WordLegacy,
        ],
    )
}

fn paths(entries: &[DriveEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.path.as_str()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_desserts_and_soup_scenario() {
    let drive = FakeDrive::new()
        .folder("root", "desserts", "Desserts")
        .file("desserts", "cake", "Cake.docx", DOCX_MIME_TYPE)
        .file("root", "soup", "Soup.docx", DOCX_MIME_TYPE);

    let entries = discoverer(drive).traverse("root").await.unwrap();

    assert_eq!(paths(&entries), vec!["Desserts/Cake.docx", "Soup.docx"]);
    assert_eq!(entries[0].id, "cake");
    assert_eq!(entries[0].name, "Cake.docx");
    assert_eq!(entries[1].document_type(), Some(DocumentType::WordOpenXml));
}

#[tokio::test]
async fn test_flat_root_paths_are_file_names() {
    let drive = FakeDrive::new()
        .file("root", "a", "Bread", GOOGLE_DOC)
        .file("root", "b", "Jam.docx", DOCX_MIME_TYPE)
        .file("root", "c", "Old.doc", "application/msword");

    let entries = discoverer(drive).traverse("root").await.unwrap();

    assert_eq!(paths(&entries), vec!["Bread", "Jam.docx", "Old.doc"]);
    assert!(entries.iter().all(|e| !e.path.contains('/')));

    let tree = FolderTree::from_entries(&entries);
    assert!(tree.folders.is_empty());
    assert_eq!(tree.documents, entries);
}

#[tokio::test]
async fn test_unlisted_types_are_excluded() {
    let drive = FakeDrive::new()
        .file("root", "a", "Menu", GOOGLE_DOC)
        .file("root", "b", "Costs", "application/vnd.google-apps.spreadsheet")
        .file("root", "c", "Photo.jpg", "image/jpeg")
        .file("root", "d", "Scan.pdf", "application/pdf");

    let entries = discoverer(drive).traverse("root").await.unwrap();

    assert_eq!(paths(&entries), vec!["Menu"]);
}

#[tokio::test]
async fn test_concatenation_property_on_deep_hierarchy() {
    // root ─ A ─ A1 ─ A1a
    //      │    └ A2
    //      └ B
    let drive = || {
        FakeDrive::new()
            .folder("root", "a", "A")
            .folder("root", "b", "B")
            .folder("a", "a1", "A1")
            .folder("a", "a2", "A2")
            .folder("a1", "a1a", "A1a")
            .file("root", "r1", "Top", GOOGLE_DOC)
            .file("a", "x1", "InA", GOOGLE_DOC)
            .file("a1", "x2", "InA1", GOOGLE_DOC)
            .file("a1a", "x3", "Deepest", GOOGLE_DOC)
            .file("a2", "x4", "InA2", GOOGLE_DOC)
            .file("b", "x5", "InB", GOOGLE_DOC)
    };

    let whole = discoverer(drive()).traverse("root").await.unwrap();
    assert_eq!(
        paths(&whole),
        vec!["A/A1/A1a/Deepest", "A/A1/InA1", "A/A2/InA2", "A/InA", "B/InB", "Top"]
    );

    // traverse(root) == traverse(A) ++ traverse(B) ++ documents(root), ids only
    // since child traversals are relative to the child.
    let d = discoverer(drive());
    let mut expected: Vec<String> = Vec::new();
    for child in ["a", "b"] {
        expected.extend(d.traverse(child).await.unwrap().into_iter().map(|e| e.id));
    }
    expected.extend(d.list_documents("root").await.unwrap().into_iter().map(|f| f.id));

    let actual: Vec<String> = whole.into_iter().map(|e| e.id).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_traverse_is_idempotent() {
    let drive = FakeDrive::new()
        .folder("root", "a", "A")
        .file("a", "x", "One", GOOGLE_DOC)
        .file("root", "y", "Two", GOOGLE_DOC);
    let d = discoverer(drive);

    let first = d.traverse("root").await.unwrap();
    let second = d.traverse("root").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pagination_accumulates_all_pages() {
    let mut drive = FakeDrive::new().page_size(2);
    for i in 0..5 {
        drive = drive.folder("root", &format!("f{}", i), &format!("F{}", i));
        drive = drive.file(&format!("f{}", i), &format!("d{}", i), "Doc", GOOGLE_DOC);
    }
    for i in 0..3 {
        drive = drive.file("root", &format!("top{}", i), &format!("Top{}", i), GOOGLE_DOC);
    }

    let entries = discoverer(drive).traverse("root").await.unwrap();

    assert_eq!(
        paths(&entries),
        vec!["F0/Doc", "F1/Doc", "F2/Doc", "F3/Doc", "F4/Doc", "Top0", "Top1", "Top2"]
    );
}

#[tokio::test]
async fn test_same_named_siblings_share_a_path() {
    let drive = FakeDrive::new()
        .folder("root", "c1", "Cakes")
        .folder("root", "c2", "Cakes")
        .file("c1", "s1", "Sponge", GOOGLE_DOC)
        .file("c2", "s2", "Sponge", GOOGLE_DOC);

    let entries = discoverer(drive).traverse("root").await.unwrap();
    assert_eq!(paths(&entries), vec!["Cakes/Sponge", "Cakes/Sponge"]);

    let tree = FolderTree::from_entries(&entries);
    assert_eq!(tree.folders.len(), 1);
    assert_eq!(tree.folders["Cakes"].documents.len(), 2);
}

#[tokio::test]
async fn test_subfolder_permission_error_aborts_everything() {
    let drive = FakeDrive::new()
        .folder("root", "ok", "Open")
        .folder("root", "locked", "Locked")
        .file("ok", "a", "Visible", GOOGLE_DOC)
        .file("root", "b", "Top", GOOGLE_DOC)
        .deny("locked");

    let result = discoverer(drive).traverse("root").await;

    assert!(matches!(
        result,
        Err(LibraryError::Bridge(BridgeError::PermissionDenied(ref id))) if id == "locked"
    ));
}

#[tokio::test]
async fn test_depth_limit() {
    let drive = FakeDrive::new()
        .folder("root", "l1", "L1")
        .folder("l1", "l2", "L2")
        .folder("l2", "l3", "L3")
        .file("l3", "deep", "Deep", GOOGLE_DOC);

    let ok = discoverer(drive).with_max_depth(3).traverse("root").await.unwrap();
    assert_eq!(paths(&ok), vec!["L1/L2/L3/Deep"]);

    let drive = FakeDrive::new()
        .folder("root", "l1", "L1")
        .folder("l1", "l2", "L2")
        .folder("l2", "l3", "L3");
    let err = discoverer(drive).with_max_depth(2).traverse("root").await.unwrap_err();

    assert!(matches!(
        err,
        LibraryError::DepthExceeded { max_depth: 2, ref path } if path == "L1/L2/L3"
    ));
}

#[tokio::test]
async fn test_cycle_is_skipped() {
    let drive = FakeDrive::new()
        .folder("root", "a", "A")
        .folder("a", "root", "Back to root")
        .folder("a", "a", "Self")
        .file("a", "x", "Doc", GOOGLE_DOC);

    let entries = discoverer(drive).traverse("root").await.unwrap();

    assert_eq!(paths(&entries), vec!["A/Doc"]);
}

#[tokio::test]
async fn test_folder_under_two_parents_is_visited_twice() {
    let drive = FakeDrive::new()
        .folder("root", "a", "A")
        .folder("root", "b", "B")
        .folder("a", "shared", "Shared")
        .folder("b", "shared", "Shared")
        .file("shared", "x", "Doc", GOOGLE_DOC);

    let entries = discoverer(drive).traverse("root").await.unwrap();

    assert_eq!(paths(&entries), vec!["A/Shared/Doc", "B/Shared/Doc"]);
}

#[tokio::test]
async fn test_calls_are_one_folder_and_one_document_listing_per_folder() {
    let drive = Arc::new(
        FakeDrive::new()
            .folder("root", "a", "A")
            .folder("root", "b", "B")
            .file("a", "x", "Doc", GOOGLE_DOC),
    );
    let d = TreeDiscoverer::new(drive.clone(), vec![DocumentType::GoogleDoc]);

    d.traverse("root").await.unwrap();

    // root, a, b: one folder listing and one document listing each
    assert_eq!(drive.calls.load(Ordering::SeqCst), 6);
}
