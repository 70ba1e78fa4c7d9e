use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::{AuthError, Result};

/// Read-only Drive scope; the shelf never writes.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// Default OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// A bearer access token with its expiry.
///
/// # Security
///
/// The `Debug` implementation redacts the token value.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// let token = AccessToken::expiring_at("ya29.a0...", now + Duration::minutes(10));
///
/// assert!(!token.is_expired_at(now, Duration::seconds(60)));
/// assert!(token.is_expired_at(now, Duration::minutes(15)));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token string
    pub token: String,
    /// When the token expires (UTC); `None` never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token that never expires (pre-issued tokens, tests).
    pub fn non_expiring(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Whether the token is expired, or will be within `buffer`, at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at - buffer,
            None => false,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 §5.1).
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

impl TokenResponse {
    pub(crate) fn into_access_token(self, issued_at: DateTime<Utc>) -> AccessToken {
        AccessToken::expiring_at(
            self.access_token,
            issued_at + Duration::seconds(self.expires_in),
        )
    }
}

/// Service-account key file as downloaded from the cloud console.
///
/// Only the fields needed for the JWT bearer grant are read.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl ServiceAccountKey {
    /// Parse a key from its JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            AuthError::InvalidCredentials(format!("Malformed service account key: {}", e))
        })?;

        if key.client_email.is_empty() || key.private_key.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Service account key is missing client_email or private_key".to_string(),
            ));
        }

        Ok(key)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
