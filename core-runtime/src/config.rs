//! # Viewer Configuration Module
//!
//! Provides configuration management for the document shelf.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ViewerConfig` holding the root folder to browse and the knobs of the
//! traversal. It enforces fail-fast validation so that a misconfigured host
//! gets an actionable message before any remote call is made.
//!
//! ## Required Settings
//!
//! - `root_folder_id` - Remote identifier of the folder to browse
//!
//! ## Optional Settings (with defaults)
//!
//! - `document_types` - Allow-list of document types (Google Docs, `.docx`, `.doc`)
//! - `include_shared_drives` - Include items hosted in shared drives (true)
//! - `page_size` - Listing page size, 1..=1000 (1000)
//! - `max_depth` - Maximum folder nesting followed during traversal (32)
//! - `max_attempts` - Attempts per remote request, first one included (3)
//!
//! ## Usage
//!
//! ```
//! use bridge_traits::DocumentType;
//! use core_runtime::config::ViewerConfig;
//!
//! let config = ViewerConfig::builder()
//!     .root_folder_id("1mO6EhBkG_lBbG2D5m8gUKHr4PftNXvds")
//!     .document_types(vec![DocumentType::GoogleDoc, DocumentType::WordOpenXml])
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.page_size, 1000);
//! ```
//!
//! ## Environment
//!
//! [`ViewerConfig::from_env`] reads the same settings from `DOCSHELF_*`
//! variables:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `DOCSHELF_ROOT_FOLDER_ID` | root folder id (required) |
//! | `DOCSHELF_DOCUMENT_TYPES` | comma list of `google_doc`, `docx`, `doc`, `pdf` |
//! | `DOCSHELF_INCLUDE_SHARED_DRIVES` | `true` / `false` |
//! | `DOCSHELF_PAGE_SIZE` | listing page size |
//! | `DOCSHELF_MAX_DEPTH` | maximum folder depth |
//! | `DOCSHELF_MAX_ATTEMPTS` | request attempts, first one included |

use crate::error::{Error, Result};
use bridge_traits::DocumentType;

pub const ENV_ROOT_FOLDER_ID: &str = "DOCSHELF_ROOT_FOLDER_ID";
pub const ENV_DOCUMENT_TYPES: &str = "DOCSHELF_DOCUMENT_TYPES";
pub const ENV_INCLUDE_SHARED_DRIVES: &str = "DOCSHELF_INCLUDE_SHARED_DRIVES";
pub const ENV_PAGE_SIZE: &str = "DOCSHELF_PAGE_SIZE";
pub const ENV_MAX_DEPTH: &str = "DOCSHELF_MAX_DEPTH";
pub const ENV_MAX_ATTEMPTS: &str = "DOCSHELF_MAX_ATTEMPTS";

/// Remote API page size limit.
pub const MAX_PAGE_SIZE: u32 = 1000;

const DEFAULT_MAX_DEPTH: usize = 32;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Document types listed when none are configured.
pub fn default_document_types() -> Vec<DocumentType> {
    vec![
        DocumentType::GoogleDoc,
        DocumentType::WordOpenXml,
        DocumentType::WordLegacy,
    ]
}

/// Configuration for the document shelf.
///
/// Use [`ViewerConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Remote identifier of the folder whose tree is shown
    pub root_folder_id: String,

    /// Document types listed during traversal, matched by exact MIME tag
    pub document_types: Vec<DocumentType>,

    /// Whether listings include items from shared drives
    pub include_shared_drives: bool,

    /// Results requested per listing page
    pub page_size: u32,

    /// Maximum folder nesting followed before the traversal fails
    pub max_depth: usize,

    /// Attempts per remote request on rate limits and server errors,
    /// the first request included
    pub max_attempts: u32,
}

impl ViewerConfig {
    /// Creates a new builder for constructing a `ViewerConfig`.
    pub fn builder() -> ViewerConfigBuilder {
        ViewerConfigBuilder::default()
    }

    /// Loads the configuration from `DOCSHELF_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    ///
    /// Unset keys fall back to their defaults; malformed values are errors
    /// naming the offending variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(root) = lookup(ENV_ROOT_FOLDER_ID) {
            builder = builder.root_folder_id(root);
        }

        if let Some(raw) = lookup(ENV_DOCUMENT_TYPES) {
            builder = builder.document_types(parse_document_types(&raw)?);
        }

        if let Some(raw) = lookup(ENV_INCLUDE_SHARED_DRIVES) {
            builder = builder.include_shared_drives(parse_bool(ENV_INCLUDE_SHARED_DRIVES, &raw)?);
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            builder = builder.page_size(parse_number(ENV_PAGE_SIZE, &raw)?);
        }

        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            builder = builder.max_depth(parse_number(ENV_MAX_DEPTH, &raw)?);
        }

        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            builder = builder.max_attempts(parse_number(ENV_MAX_ATTEMPTS, &raw)?);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.root_folder_id.trim().is_empty() {
            return Err(Error::Config(
                "Root folder id cannot be empty".to_string(),
            ));
        }

        if self.document_types.is_empty() {
            return Err(Error::Config(
                "At least one document type must be allowed".to_string(),
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.max_depth == 0 {
            return Err(Error::Config(
                "Maximum folder depth must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(Error::Config(
                "Max attempts counts the first request and must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether documents of this type are listed.
    pub fn allows(&self, document_type: DocumentType) -> bool {
        self.document_types.contains(&document_type)
    }
}

/// Builder for constructing [`ViewerConfig`] instances.
#[derive(Debug, Default)]
pub struct ViewerConfigBuilder {
    root_folder_id: Option<String>,
    document_types: Option<Vec<DocumentType>>,
    include_shared_drives: Option<bool>,
    page_size: Option<u32>,
    max_depth: Option<usize>,
    max_attempts: Option<u32>,
}

impl ViewerConfigBuilder {
    /// Sets the root folder identifier (required).
    pub fn root_folder_id(mut self, id: impl Into<String>) -> Self {
        self.root_folder_id = Some(id.into());
        self
    }

    /// Sets the document type allow-list. Duplicates are removed.
    pub fn document_types(mut self, types: Vec<DocumentType>) -> Self {
        let mut unique = Vec::with_capacity(types.len());
        for document_type in types {
            if !unique.contains(&document_type) {
                unique.push(document_type);
            }
        }
        self.document_types = Some(unique);
        self
    }

    /// Includes or excludes shared-drive items from listings.
    ///
    /// Default: true
    pub fn include_shared_drives(mut self, include: bool) -> Self {
        self.include_shared_drives = Some(include);
        self
    }

    /// Sets the listing page size.
    ///
    /// Default: 1000 (the API maximum)
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Sets the maximum folder depth.
    ///
    /// Default: 32
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the number of attempts per remote request, the first included.
    ///
    /// Default: 3
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Builds the final `ViewerConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the root folder id is missing or any
    /// value is out of range.
    pub fn build(self) -> Result<ViewerConfig> {
        let root_folder_id = self.root_folder_id.ok_or_else(|| {
            Error::Config(format!(
                "Root folder id is required. Use .root_folder_id() or set {}.",
                ENV_ROOT_FOLDER_ID
            ))
        })?;

        let config = ViewerConfig {
            root_folder_id: root_folder_id.trim().to_string(),
            document_types: self.document_types.unwrap_or_else(default_document_types),
            include_shared_drives: self.include_shared_drives.unwrap_or(true),
            page_size: self.page_size.unwrap_or(MAX_PAGE_SIZE),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };

        config.validate()?;

        Ok(config)
    }
}

fn parse_document_types(raw: &str) -> Result<Vec<DocumentType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            DocumentType::parse(part).ok_or_else(|| {
                invalid_setting(
                    ENV_DOCUMENT_TYPES,
                    format!(
                        "unknown document type '{}' (expected google_doc, docx, doc or pdf)",
                        part
                    ),
                )
            })
        })
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid_setting(
            key,
            format!("expected a boolean, got '{}'", other),
        )),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_setting(key, format!("expected a number, got '{}'", raw.trim())))
}

fn invalid_setting(key: &str, message: String) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        message,
    }
}
