//! # Host Bridge Traits
//!
//! Abstraction traits the core is written against and hosts implement.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and the
//! collaborators it depends on. Each trait represents a capability that the
//! core requires but that is provided from outside: the transport, the time
//! source and the remote file-storage service.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP request/response execution
//! - [`StorageProvider`](storage::StorageProvider) - Paginated child listing and document download
//! - [`Clock`](time::Clock) - Time source for deterministic token-expiry tests
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert their own errors into it, keeping the
//! permission / not-found / rate-limit distinction so callers can report
//! them meaningfully.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single instance can be
//! shared for the whole session.

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{
    ChildFilter, ContentType, DocumentType, ListPage, ListRequest, RemoteFile, RenderMode,
    StorageProvider,
};
pub use time::{Clock, LogLevel, SystemClock};
