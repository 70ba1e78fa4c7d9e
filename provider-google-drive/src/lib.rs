//! # Google Drive Provider
//!
//! Implements `StorageProvider` trait for Google Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Child listing by parent folder, filtered to folders or to an exact set
//!   of document MIME types, one page at a time
//! - Shared-drive aware requests
//! - Export of native documents to `.docx` and raw download of binary ones
//! - Preview links for documents that are not rendered in-app
//! - Rate limiting and exponential backoff

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{GoogleDriveConnector, MAX_PAGE_SIZE};
pub use error::{GoogleDriveError, Result};
