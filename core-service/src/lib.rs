//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP transport,
//! clock, token source) into the document shelf core and exposes the
//! [`ViewerService`] hosts drive their display from. Desktop apps typically
//! enable the `desktop-shims` feature (which depends on `bridge-desktop` and
//! the Drive connector) and call [`bootstrap_desktop`].

pub mod error;
pub mod viewer;

pub use error::{CoreError, Result};
pub use viewer::{DocumentView, TreeView, ViewerService, NO_DOCUMENTS_WARNING};

#[cfg(feature = "desktop-shims")]
use std::sync::Arc;

#[cfg(feature = "desktop-shims")]
use bridge_traits::{Clock, HttpClient, SystemClock};
#[cfg(feature = "desktop-shims")]
use core_auth::{DriveSession, TokenSource};
#[cfg(feature = "desktop-shims")]
use core_runtime::ViewerConfig;

/// Convenience bootstrapper for desktop hosts.
///
/// Builds the reqwest transport, a session over `token_source` and a Drive
/// connector tuned from `config`.
///
/// ```ignore
/// use core_auth::StaticTokenSource;
/// use core_runtime::ViewerConfig;
/// use std::sync::Arc;
///
/// let config = ViewerConfig::from_env()?;
/// let viewer = core_service::bootstrap_desktop(config, Arc::new(StaticTokenSource::new(token)))?;
/// let view = viewer.load_tree().await;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    config: ViewerConfig,
    token_source: Arc<dyn TokenSource>,
) -> Result<ViewerService> {
    config.validate()?;

    let http_client: Arc<dyn HttpClient> = Arc::new(
        bridge_desktop::ReqwestHttpClient::new()
            .map_err(|err| CoreError::InitializationFailed(err.to_string()))?,
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session = Arc::new(DriveSession::with_clock(token_source, clock));

    let connector = provider_google_drive::GoogleDriveConnector::new(http_client, session)
        .with_shared_drives(config.include_shared_drives)
        .with_page_size(config.page_size)
        .with_max_attempts(config.max_attempts);

    tracing::info!(
        root = %config.root_folder_id,
        shared_drives = config.include_shared_drives,
        "Desktop viewer bootstrapped"
    );

    Ok(ViewerService::new(Arc::new(connector), config))
}
