//! Token sources
//!
//! A [`TokenSource`] produces a fresh access token on demand. The
//! [`DriveSession`](crate::DriveSession) decides *when* to ask.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::AccessToken;

/// Something that can mint an access token for the Drive API.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Obtain a new token from the issuer.
    async fn fetch_token(&self) -> Result<AccessToken>;

    /// Short label for logs ("static", "refresh_token", "service_account").
    fn kind(&self) -> &'static str;
}

/// A pre-issued token handed in by the host.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: AccessToken,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::non_expiring(token),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Result<AccessToken> {
        Ok(self.token.clone())
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}
