//! Folder tree grouping
//!
//! Nests the flat, path-tagged entry list from a traversal into a tree keyed
//! by folder name.

use std::collections::BTreeMap;

use crate::models::{DriveEntry, PATH_SEPARATOR};

/// Nested view of a traversal result.
///
/// Folders are ordered by name; documents keep discovery order. Two sibling
/// folders with the same name merge into one node. Two sibling documents
/// with the same name are both kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTree {
    pub folders: BTreeMap<String, FolderTree>,
    pub documents: Vec<DriveEntry>,
}

impl FolderTree {
    /// Group entries by their path segments.
    ///
    /// An entry is a leaf at the current level when its remaining path has a
    /// single segment or equals the entry's own name (names may themselves
    /// contain the separator). Otherwise it is placed under its first
    /// segment and grouped again with that segment removed. Entries keep
    /// their full original path.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a DriveEntry>,
    {
        let mut tree = FolderTree::default();
        for entry in entries {
            tree.insert(&entry.path, entry);
        }
        tree
    }

    fn insert(&mut self, remaining: &str, entry: &DriveEntry) {
        if remaining == entry.name {
            self.documents.push(entry.clone());
            return;
        }

        match remaining.split_once(PATH_SEPARATOR) {
            Some((folder, rest)) if !rest.is_empty() => self
                .folders
                .entry(folder.to_string())
                .or_default()
                .insert(rest, entry),
            _ => self.documents.push(entry.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.folders.values().all(FolderTree::is_empty)
    }

    /// Number of documents in this node and every node below it.
    pub fn document_count(&self) -> usize {
        self.documents.len()
            + self
                .folders
                .values()
                .map(FolderTree::document_count)
                .sum::<usize>()
    }

    /// Node at a slash-joined folder path. The empty path is this node.
    pub fn folder(&self, path: &str) -> Option<&FolderTree> {
        if path.is_empty() {
            return Some(self);
        }
        path.split(PATH_SEPARATOR)
            .try_fold(self, |node, segment| node.folders.get(segment))
    }

    /// All documents in display order: subfolders first (by name,
    /// depth-first), then this node's own documents.
    pub fn documents(&self) -> impl Iterator<Item = &DriveEntry> + '_ {
        let mut out: Vec<&DriveEntry> = Vec::with_capacity(self.document_count());
        self.collect_documents(&mut out);
        out.into_iter()
    }

    fn collect_documents<'a>(&'a self, out: &mut Vec<&'a DriveEntry>) {
        for child in self.folders.values() {
            child.collect_documents(out);
        }
        out.extend(self.documents.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use bridge_traits::storage::{ContentType, DocumentType};

    fn doc(id: &str, path: &str) -> DriveEntry {
        let name = path.rsplit(PATH_SEPARATOR).next().unwrap_or(path).to_string();
        named(id, &name, path)
    }

    fn named(id: &str, name: &str, path: &str) -> DriveEntry {
        DriveEntry {
            name: name.to_string(),
            id: id.to_string(),
            path: path.to_string(),
            kind: EntryKind::Document,
            content_type: ContentType::Document(DocumentType::GoogleDoc),
        }
    }

    #[test]
    fn test_flat_entries_are_leaves() {
        let entries = vec![doc("1", "Soup"), doc("2", "Bread")];
        let tree = FolderTree::from_entries(&entries);

        assert!(tree.folders.is_empty());
        assert_eq!(tree.documents, entries);
    }

    #[test]
    fn test_nested_grouping_keeps_full_path() {
        let entries = vec![
            doc("1", "Mains/Fish/Cod"),
            doc("2", "Mains/Stew"),
            doc("3", "Soup"),
        ];
        let tree = FolderTree::from_entries(&entries);

        let mains = tree.folder("Mains").unwrap();
        assert_eq!(mains.documents[0].path, "Mains/Stew");
        let fish = tree.folder("Mains/Fish").unwrap();
        assert_eq!(fish.documents[0].path, "Mains/Fish/Cod");
        assert_eq!(tree.documents[0].id, "3");
        assert_eq!(tree.document_count(), 3);
    }

    #[test]
    fn test_same_named_folders_merge_and_documents_both_kept() {
        let entries = vec![
            doc("1", "Cakes/Sponge"),
            doc("2", "Cakes/Sponge"),
            doc("3", "Cakes/Cheese"),
        ];
        let tree = FolderTree::from_entries(&entries);

        assert_eq!(tree.folders.len(), 1);
        let ids: Vec<_> = tree.folders["Cakes"]
            .documents
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_name_containing_separator_is_leaf() {
        let entries = vec![named("1", "Half/half", "Half/half"), named("2", "A/B", "Dips/A/B")];
        let tree = FolderTree::from_entries(&entries);

        assert_eq!(tree.documents.len(), 1);
        assert_eq!(tree.documents[0].id, "1");
        assert_eq!(tree.folder("Dips").unwrap().documents[0].id, "2");
    }

    #[test]
    fn test_folders_sorted_and_documents_iterated_in_display_order() {
        let entries = vec![doc("1", "Zest/Lemon"), doc("2", "Apple/Pie"), doc("3", "Top")];
        let tree = FolderTree::from_entries(&entries);

        let keys: Vec<_> = tree.folders.keys().cloned().collect();
        assert_eq!(keys, vec!["Apple", "Zest"]);

        let ids: Vec<_> = tree.documents().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let entries = vec![doc("1", "A/B/C"), doc("2", "A/D"), doc("3", "E")];
        let first = FolderTree::from_entries(&entries);
        let second = FolderTree::from_entries(&entries);
        assert_eq!(first, second);

        let regrouped: Vec<DriveEntry> = first.documents().cloned().collect();
        assert_eq!(FolderTree::from_entries(&regrouped), first);
    }

    #[test]
    fn test_empty_tree() {
        let tree = FolderTree::from_entries(std::iter::empty());
        assert!(tree.is_empty());
        assert_eq!(tree.document_count(), 0);
        assert!(tree.folder("missing").is_none());
        assert!(tree.folder("").is_some());
    }
}
