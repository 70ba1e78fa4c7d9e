//! # Library Module
//!
//! Discovers the documents shared under a root folder and groups them into
//! a browsable tree.
//!
//! ## Overview
//!
//! This module provides:
//! - [`TreeDiscoverer`]: paginated listing and depth-first traversal over a
//!   [`StorageProvider`](bridge_traits::StorageProvider)
//! - [`FolderTree`]: nesting of the flat, path-tagged traversal result
//! - [`DriveEntry`]: the entry model both operate on

pub mod discovery;
pub mod error;
pub mod models;
pub mod tree;

pub use discovery::{TreeDiscoverer, DEFAULT_MAX_DEPTH};
pub use error::{LibraryError, Result};
pub use models::{join_path, DriveEntry, EntryKind, PATH_SEPARATOR};
pub use tree::FolderTree;
