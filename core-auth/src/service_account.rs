//! Service-account JWT bearer grant (RFC 7523)
//!
//! Signs a short-lived RS256 assertion with the account's private key and
//! exchanges it at the key's token endpoint.

use async_trait::async_trait;
use bridge_traits::{Clock, HttpClient};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AuthError, Result};
use crate::oauth::post_token_request;
use crate::source::TokenSource;
use crate::types::{AccessToken, ServiceAccountKey, DRIVE_READONLY_SCOPE};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
pub(crate) struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Mints tokens for a service account that the root folder is shared with.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scopes: Vec<String>,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl ServiceAccountTokenSource {
    /// Build a source from a parsed key.
    ///
    /// # Errors
    ///
    /// Fails with [`AuthError::InvalidCredentials`] when the private key is
    /// not an RSA PEM.
    pub fn new(
        key: ServiceAccountKey,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        // Key files sometimes carry literal "\n" sequences
        let pem = key.private_key.replace("\\n", "\n");
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            AuthError::InvalidCredentials(format!("Failed to load private key: {}", e))
        })?;

        Ok(Self {
            key,
            encoding_key,
            scopes: vec![DRIVE_READONLY_SCOPE.to_string()],
            http_client,
            clock,
        })
    }

    /// Build a source straight from the key file's JSON.
    pub fn from_json(
        json: &str,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Self::new(ServiceAccountKey::from_json(json)?, http_client, clock)
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub(crate) fn sign_assertion(&self, issued_at: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let header = Header {
            alg: Algorithm::RS256,
            kid: self.key.private_key_id.clone(),
            ..Default::default()
        };

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidCredentials(format!("Failed to sign assertion: {}", e)))
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let issued_at = self.clock.now();
        let assertion = self.sign_assertion(issued_at.timestamp())?;

        debug!(token_uri = %self.key.token_uri, "Exchanging service account assertion");

        let encoded = serde_urlencoded::to_string([
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ])
        .map_err(|e| {
            AuthError::TokenRefreshFailed(format!("Failed to encode token request: {}", e))
        })?;

        let token_response =
            post_token_request(self.http_client.as_ref(), &self.key.token_uri, encoded).await?;

        info!(
            expires_in = token_response.expires_in,
            "Obtained service account access token"
        );

        Ok(token_response.into_access_token(issued_at))
    }

    fn kind(&self) -> &'static str {
        "service_account"
    }
}
