//! Docshelf workspace entry point.
//!
//! Re-exports the service façade so hosts can depend on a single crate.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
