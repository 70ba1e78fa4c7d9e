//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the document shelf:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the validated configuration
//! (root folder, document allow-list, traversal limits) passed to the
//! traversal and the remote connector.

pub mod config;
pub mod error;
pub mod logging;

pub use config::ViewerConfig;
pub use error::{Error, Result};
