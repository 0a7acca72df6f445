//! Google Drive API connector implementation
//!
//! Builds Drive v3 requests on top of the `HttpClient` bridge and implements
//! `RemoteLister` against `files.list`.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::listing::{ListRequest, Page, RemoteLister};
use core_runtime::config::DriveConfig;
use core_runtime::logging::redact_query;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{GoogleDriveError, Result};
use crate::types::{FilesListResponse, PagedList};

/// Google Drive API connector
///
/// Every request carries the bearer token and the configured timeout, and is
/// sent through [`HttpClient::execute_with_retry`] with the configured retry
/// policy, so 429 and 5xx answers are retried by the transport.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::listing::{ListRequest, RemoteLister};
///
/// let connector = GoogleDriveConnector::new(http_client, access_token, DriveConfig::default());
/// let page = connector.list(ListRequest::new(None, "*")).await?;
/// ```
pub struct GoogleDriveConnector {
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token
    access_token: String,

    config: DriveConfig,
}

impl GoogleDriveConnector {
    /// Create a new Google Drive connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `access_token` - OAuth 2.0 access token with a `drive` scope
    /// * `config` - Validated client settings
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        access_token: impl Into<String>,
        config: DriveConfig,
    ) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            config,
        }
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Absolute URL for an API path with encoded query parameters
    pub(crate) fn url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.config.api_base_url, path.trim_start_matches('/'));
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Send one request and map non-success statuses to errors
    #[instrument(skip_all, fields(method = method.as_str(), path = %path))]
    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(method, self.url(path, params))
            .bearer_token(&self.access_token)
            .header("Accept", "application/json")
            .timeout(self.config.request_timeout);
        if let Some(body) = body {
            request = request.json(body)?;
        }

        let response = self
            .http_client
            .execute_with_retry(request, self.config.retry_policy())
            .await?;

        if response.is_success() {
            debug!(status = response.status, "API request succeeded");
            return Ok(response);
        }

        warn!(status = response.status, "API request failed");
        Err(status_error(path, &response))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.send(HttpMethod::Get, path, params, None).await?;
        parse(path, &response)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<T> {
        let body = to_value(body)?;
        let response = self
            .send(HttpMethod::Post, path, params, Some(&body))
            .await?;
        parse(path, &response)
    }

    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<T> {
        let body = to_value(body)?;
        let response = self
            .send(HttpMethod::Patch, path, params, Some(&body))
            .await?;
        parse(path, &response)
    }

    /// Every item of a paged collection, following `nextPageToken`
    ///
    /// Stops early if the server hands back a token it already issued.
    pub(crate) async fn get_all<P: PagedList>(&self, path: &str) -> Result<Vec<P::Item>> {
        let fields = format!("nextPageToken, {}", P::FIELD);
        let mut items = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![("fields", fields.as_str())];
            if let Some(token) = token.as_deref() {
                params.push(("pageToken", token));
            }
            let page: P = self.get_json(path, &params).await?;
            let (page_items, next) = page.into_page();
            items.extend(page_items);

            match next {
                Some(next) if seen.insert(next.clone()) => token = Some(next),
                Some(_) => {
                    warn!(path = %path, "Page token repeated, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(items)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(HttpMethod::Delete, path, &[], None).await?;
        Ok(())
    }

    async fn list_files(&self, request: &ListRequest) -> Result<Page> {
        let fields = format!("nextPageToken, files({})", request.fields);
        let page_size = self.config.page_size.to_string();

        let mut params: Vec<(&str, &str)> = Vec::with_capacity(5);
        if let Some(query) = request.query.as_deref() {
            params.push(("q", query));
        }
        params.push(("fields", fields.as_str()));
        params.push(("pageSize", page_size.as_str()));
        params.push(("spaces", self.config.spaces.as_str()));
        if let Some(token) = request.page_token.as_deref() {
            params.push(("pageToken", token));
        }

        let response: FilesListResponse = self.get_json("files", &params).await?;
        Ok(Page::new(response.files, response.next_page_token))
    }
}

#[async_trait]
impl RemoteLister for GoogleDriveConnector {
    #[instrument(
        skip(self, request),
        fields(
            query = %request.query.as_deref().map(redact_query).unwrap_or_default(),
            has_cursor = request.page_token.is_some()
        )
    )]
    async fn list(&self, request: ListRequest) -> bridge_traits::error::Result<Page> {
        let page = self.list_files(&request).await?;
        debug!(
            files = page.entities.len(),
            has_more = page.has_more(),
            "Listed files page"
        );
        Ok(page)
    }
}

fn to_value<B: Serialize>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| GoogleDriveError::InvalidInput(format!("Unserializable request body: {}", e)))
}

fn parse<T: DeserializeOwned>(path: &str, response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        GoogleDriveError::ParseError(format!("Failed to parse response from {}: {}", path, e))
    })
}

/// Map an error response, preferring the message in Google's error envelope
fn status_error(path: &str, response: &HttpResponse) -> GoogleDriveError {
    if response.status == 404 {
        return GoogleDriveError::NotFound {
            resource: path.to_string(),
        };
    }

    let message = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            body.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| response.text_lossy());

    GoogleDriveError::ApiError {
        status_code: response.status,
        message,
    }
}
