//! # Authentication Module
//!
//! Access-token management for the Drive connector.
//!
//! ## Overview
//!
//! The shelf reads a single shared folder, so authentication is reduced to
//! keeping one valid bearer token around. A [`DriveSession`] caches the
//! token and asks its [`TokenSource`] for a new one shortly before expiry.
//!
//! ## Token sources
//!
//! - [`StaticTokenSource`] - pre-issued token supplied by the host
//! - [`RefreshTokenSource`] - OAuth 2.0 refresh-token grant
//! - [`ServiceAccountTokenSource`] - signed JWT bearer grant for a service
//!   account the folder is shared with

pub mod error;
pub mod oauth;
pub mod service_account;
pub mod session;
pub mod source;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::{RefreshTokenConfig, RefreshTokenSource};
pub use service_account::ServiceAccountTokenSource;
pub use session::{DriveSession, DEFAULT_REFRESH_BUFFER_SECS};
pub use source::{StaticTokenSource, TokenSource};
pub use types::{AccessToken, ServiceAccountKey, DRIVE_READONLY_SCOPE, GOOGLE_TOKEN_URL};
