//! Drive session
//!
//! Caches the current access token and refreshes it shortly before it
//! expires, so every remote call carries a valid bearer token.

use bridge_traits::{Clock, SystemClock};
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::source::{StaticTokenSource, TokenSource};
use crate::types::AccessToken;

/// Tokens are refreshed this long before their recorded expiry.
pub const DEFAULT_REFRESH_BUFFER_SECS: i64 = 60;

/// Authenticated session shared by every remote call.
///
/// # Example
///
/// ```ignore
/// let session = DriveSession::new(Arc::new(StaticTokenSource::new(token)));
/// let bearer = session.bearer_token().await?;
/// ```
pub struct DriveSession {
    source: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<AccessToken>>,
    refresh_buffer: Duration,
}

impl DriveSession {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<dyn TokenSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            cached: Mutex::new(None),
            refresh_buffer: Duration::seconds(DEFAULT_REFRESH_BUFFER_SECS),
        }
    }

    /// Session over a pre-issued token.
    pub fn from_static_token(token: impl Into<String>) -> Self {
        Self::new(Arc::new(StaticTokenSource::new(token)))
    }

    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    /// Current bearer token, refreshed first if it is missing or about to
    /// expire.
    ///
    /// Concurrent callers share one refresh.
    #[instrument(skip(self), fields(source = self.source.kind()))]
    pub async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(token) = cached.as_ref() {
            if !token.is_expired_at(now, self.refresh_buffer) {
                return Ok(token.token.clone());
            }
            debug!("Access token expiring, refreshing");
        }

        let fresh = self.source.fetch_token().await?;
        let bearer = fresh.token.clone();
        *cached = Some(fresh);
        Ok(bearer)
    }

    /// Drop the cached token; the next call fetches a new one.
    ///
    /// Called after the API rejects a token with 401.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            debug!("Cached access token invalidated");
        }
    }
}
