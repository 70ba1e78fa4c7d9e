//! Google Drive API connector implementation
//!
//! Implements the `StorageProvider` trait for Google Drive API v3.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::storage::{
    ChildFilter, DocumentType, ListPage, ListRequest, RemoteFile, RenderMode, StorageProvider,
    FOLDER_MIME_TYPE,
};
use bytes::Bytes;
use core_auth::DriveSession;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{GoogleDriveError, Result};
use crate::types::{ApiErrorResponse, FilesListResponse};

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Maximum results per page (Google Drive API limit)
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Fields to request for file resources
const LIST_FIELDS: &str = "nextPageToken,files(id,name,mimeType)";

/// Upper bound on a server-requested `Retry-After` wait
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Google Drive API connector
///
/// # Features
///
/// - Child listing by parent with an exact MIME-type filter
/// - Shared-drive aware requests (`supportsAllDrives`)
/// - Export of native documents to `.docx`, raw download otherwise
/// - Exponential backoff for rate limiting and server errors
/// - Bearer token from a [`DriveSession`] on every request
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::storage::{ListRequest, StorageProvider};
///
/// let connector = GoogleDriveConnector::new(http_client, session);
/// let page = connector.list_children(&ListRequest::folders(root_id)).await?;
/// ```
pub struct GoogleDriveConnector {
    http_client: Arc<dyn HttpClient>,
    session: Arc<DriveSession>,
    include_shared_drives: bool,
    page_size: u32,
    retry_policy: RetryPolicy,
    base_url: String,
}

impl GoogleDriveConnector {
    /// Create a new Google Drive connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `session` - session issuing tokens with `drive.readonly` scope
    pub fn new(http_client: Arc<dyn HttpClient>, session: Arc<DriveSession>) -> Self {
        Self {
            http_client,
            session,
            include_shared_drives: true,
            page_size: MAX_PAGE_SIZE,
            retry_policy: RetryPolicy::default(),
            base_url: DRIVE_API_BASE.to_string(),
        }
    }

    pub fn with_shared_drives(mut self, include: bool) -> Self {
        self.include_shared_drives = include;
        self
    }

    /// Page size, clamped to `1..=1000`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Attempts per request for 429 and 5xx responses, the first included.
    /// Zero is treated as one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry_policy.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the `q` expression for a listing request.
    pub(crate) fn build_query(request: &ListRequest) -> Option<String> {
        let parent = format!("'{}' in parents", escape_query_literal(&request.parent_id));

        let mime_clause = match &request.filter {
            ChildFilter::Folders => format!("mimeType='{}'", FOLDER_MIME_TYPE),
            ChildFilter::Documents(types) => match types.as_slice() {
                [] => return None,
                [single] => format!("mimeType='{}'", single.mime_type()),
                many => format!(
                    "({})",
                    many.iter()
                        .map(|t| format!("mimeType='{}'", t.mime_type()))
                        .collect::<Vec<_>>()
                        .join(" or ")
                ),
            },
        };

        Some(format!("{} and {} and trashed=false", parent, mime_clause))
    }

    fn list_url(&self, query: &str, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/files?q={}&pageSize={}&fields={}",
            self.base_url,
            urlencoding::encode(query),
            self.page_size,
            urlencoding::encode(LIST_FIELDS)
        );

        if self.include_shared_drives {
            url.push_str("&supportsAllDrives=true&includeItemsFromAllDrives=true");
        }

        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&urlencoding::encode(token));
        }

        url
    }

    fn download_url(&self, file_id: &str, mode: RenderMode) -> Option<String> {
        let id = urlencoding::encode(file_id);
        match mode {
            RenderMode::Export { mime_type } => Some(format!(
                "{}/files/{}/export?mimeType={}",
                self.base_url,
                id,
                urlencoding::encode(mime_type)
            )),
            RenderMode::Media => {
                let mut url = format!("{}/files/{}?alt=media", self.base_url, id);
                if self.include_shared_drives {
                    url.push_str("&supportsAllDrives=true");
                }
                Some(url)
            }
            RenderMode::PreviewOnly => None,
        }
    }

    /// Execute a GET with the session token, retrying 429 and 5xx
    ///
    /// A 401 drops the cached token and retries once with a fresh one.
    #[instrument(skip_all, fields(resource = %resource))]
    async fn get_with_retry(&self, url: &str, resource: &str) -> Result<HttpResponse> {
        let max_attempts = self.retry_policy.max_attempts.max(1);
        let mut attempt = 0;
        let mut reauthenticated = false;

        loop {
            let token = self.session.bearer_token().await?;
            let request = HttpRequest::new(HttpMethod::Get, url)
                .bearer_token(&token)
                .header("Accept", "application/json")
                .timeout(Duration::from_secs(30));

            let response = self.http_client.execute(request).await?;
            let status = response.status;

            if response.is_success() {
                debug!(status, "API request succeeded");
                return Ok(response);
            }

            if status == 401 && !reauthenticated {
                warn!("Access token rejected, refreshing session");
                self.session.invalidate().await;
                reauthenticated = true;
                continue;
            }

            let transient = status == 429 || response.is_server_error();
            attempt += 1;

            if !transient || attempt >= max_attempts {
                if transient {
                    warn!(status, attempts = attempt, "API request failed after retries");
                } else {
                    warn!(status, "API request failed");
                }
                return Err(map_status(&response, resource));
            }

            let backoff = self.retry_policy.delay_for(attempt);
            let delay = match response.retry_after_seconds() {
                Some(secs) if status == 429 => Duration::from_secs(secs).min(MAX_RETRY_AFTER),
                _ => backoff,
            };
            warn!(
                status,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "API request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let Some(query) = Self::build_query(request) else {
            debug!("Empty document type filter, nothing to list");
            return Ok(ListPage::default());
        };

        let url = self.list_url(&query, request.page_token.as_deref());
        let response = self.get_with_retry(&url, &request.parent_id).await?;

        let list: FilesListResponse = response
            .json()
            .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;

        debug!(
            count = list.files.len(),
            has_more = list.next_page_token.is_some(),
            "Listed children"
        );

        Ok(ListPage {
            files: list
                .files
                .into_iter()
                .map(|f| RemoteFile::new(f.id, f.name, f.mime_type))
                .collect(),
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

/// Escape a value for use inside a single-quoted query literal.
pub(crate) fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn map_status(response: &HttpResponse, resource: &str) -> GoogleDriveError {
    let message = response
        .json::<ApiErrorResponse>()
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| response.text_lossy());

    match response.status {
        401 => GoogleDriveError::AuthenticationFailed(message),
        403 => GoogleDriveError::PermissionDenied(format!("{}: {}", resource, message)),
        404 => GoogleDriveError::FileNotFound {
            file_id: resource.to_string(),
        },
        429 => GoogleDriveError::RateLimitExceeded {
            retry_after_seconds: response.retry_after_seconds().unwrap_or(0),
        },
        status_code => GoogleDriveError::ApiError {
            status_code,
            message,
        },
    }
}

#[async_trait]
impl StorageProvider for GoogleDriveConnector {
    #[instrument(skip(self, request), fields(parent_id = %request.parent_id))]
    async fn list_children(&self, request: &ListRequest) -> BridgeResult<ListPage> {
        Ok(self.list_page(request).await?)
    }

    #[instrument(skip(self))]
    async fn download(&self, file_id: &str, document_type: DocumentType) -> BridgeResult<Bytes> {
        let Some(url) = self.download_url(file_id, document_type.render_mode()) else {
            return Err(BridgeError::NotAvailable(format!(
                "{} documents are preview-only",
                document_type
            )));
        };

        let response = self.get_with_retry(&url, file_id).await?;
        info!(bytes = response.body.len(), "Downloaded document");
        Ok(response.body)
    }

    fn preview_url(&self, file_id: &str, document_type: DocumentType) -> String {
        let id = urlencoding::encode(file_id);
        match document_type {
            DocumentType::GoogleDoc => {
                format!("https://docs.google.com/document/d/{}/preview", id)
            }
            _ => format!("https://drive.google.com/file/d/{}/preview", id),
        }
    }
}
