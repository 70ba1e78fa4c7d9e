//! OAuth 2.0 refresh-token grant
//!
//! The shelf is read-only and headless, so it never runs an interactive
//! authorization flow. A host that already holds a long-lived refresh token
//! exchanges it here for short-lived access tokens.

use async_trait::async_trait;
use bridge_traits::{Clock, HttpClient, HttpMethod, HttpRequest};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AuthError, Result};
use crate::source::TokenSource;
use crate::types::{AccessToken, TokenResponse, GOOGLE_TOKEN_URL};

const MAX_TOKEN_ATTEMPTS: u32 = 3;

/// OAuth client credentials plus the refresh token to exchange.
#[derive(Clone)]
pub struct RefreshTokenConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub refresh_token: String,
    pub token_url: String,
}

impl RefreshTokenConfig {
    pub fn new(client_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            refresh_token: refresh_token.into(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }
}

impl std::fmt::Debug for RefreshTokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Exchanges a refresh token for access tokens.
pub struct RefreshTokenSource {
    config: RefreshTokenConfig,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenSource {
    pub fn new(
        config: RefreshTokenConfig,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            http_client,
            clock,
        }
    }
}

#[async_trait]
impl TokenSource for RefreshTokenSource {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", self.config.refresh_token.as_str());
        params.insert("client_id", self.config.client_id.as_str());

        if let Some(ref client_secret) = self.config.client_secret {
            params.insert("client_secret", client_secret.as_str());
        }

        debug!("Refreshing access token");

        let encoded = serde_urlencoded::to_string(&params).map_err(|e| {
            AuthError::TokenRefreshFailed(format!("Failed to encode token request: {}", e))
        })?;

        let token_response =
            post_token_request(self.http_client.as_ref(), &self.config.token_url, encoded).await?;

        info!(
            expires_in = token_response.expires_in,
            "Successfully refreshed access token"
        );

        Ok(token_response.into_access_token(self.clock.now()))
    }

    fn kind(&self) -> &'static str {
        "refresh_token"
    }
}

/// POST a form-encoded grant to a token endpoint.
///
/// 4xx responses fail immediately. 5xx responses are retried with
/// exponential backoff up to [`MAX_TOKEN_ATTEMPTS`] attempts.
pub(crate) async fn post_token_request(
    http_client: &dyn HttpClient,
    token_url: &str,
    encoded_body: String,
) -> Result<TokenResponse> {
    let mut attempts = 0;

    loop {
        attempts += 1;

        let request = HttpRequest::new(HttpMethod::Post, token_url).form(encoded_body.clone());

        let response = http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;

        if response.is_success() {
            return response.json::<TokenResponse>().map_err(|e| {
                AuthError::TokenRefreshFailed(format!("Failed to parse token response: {}", e))
            });
        }

        let status = response.status;

        if response.is_client_error() {
            let error_body = response.text_lossy();
            warn!(
                status = status,
                error = %error_body,
                "Token request rejected without retry"
            );

            return Err(AuthError::AuthenticationFailed(format!(
                "Token endpoint returned {}: {}",
                status, error_body
            )));
        }

        if attempts >= MAX_TOKEN_ATTEMPTS {
            return Err(AuthError::TokenRefreshFailed(format!(
                "Token request failed after {} attempts. Last error: {} - {}",
                attempts,
                status,
                response.text_lossy()
            )));
        }

        let delay = Duration::from_millis(100 * 2u64.pow(attempts - 1));
        warn!(
            status = status,
            attempts = attempts,
            delay_ms = delay.as_millis() as u64,
            "Token request failed, retrying"
        );
        sleep(delay).await;
    }
}
