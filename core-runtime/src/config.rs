//! # Client Configuration
//!
//! Validated settings shared by the Drive connector and the listing engine.
//!
//! ## Overview
//!
//! `DriveConfig` is built through [`DriveConfigBuilder`], which validates
//! every value up front so that a bad page size or an empty API base fails at
//! startup instead of on the first request.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::DriveConfig;
//! use std::time::Duration;
//!
//! let config = DriveConfig::builder()
//!     .page_size(500)
//!     .max_depth(8)
//!     .request_timeout(Duration::from_secs(20))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::http::RetryPolicy;
use std::time::Duration;

/// Drive API v3 metadata endpoint
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Largest page the files endpoint will return
pub const MAX_PAGE_SIZE: u32 = 1000;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_DEPTH: u32 = 32;
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Settings for a Drive client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveConfig {
    /// Base URL for metadata endpoints, without trailing slash
    pub api_base_url: String,

    /// Results requested per listing page (1..=1000)
    pub page_size: u32,

    /// Field selector used when a call does not supply one
    pub default_fields: String,

    /// Corpus searched by listings (`drive`, `appDataFolder`)
    pub spaces: String,

    /// Deepest folder level a recursive listing descends into
    pub max_depth: u32,

    /// Page fetches allowed per listing session before it stops
    pub max_pages: u32,

    /// Per-request timeout handed to the transport
    pub request_timeout: Duration,

    /// Retries after the first attempt; 0 sends each request once
    pub max_retries: u32,

    /// Delay before the first retry
    pub retry_base_delay: Duration,
}

impl DriveConfig {
    pub fn builder() -> DriveConfigBuilder {
        DriveConfigBuilder::default()
    }

    /// Retry policy handed to the HTTP transport
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.saturating_add(1),
            base_delay: self.retry_base_delay,
            ..RetryPolicy::default()
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            default_fields: "*".to_string(),
            spaces: "drive".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(100),
        }
    }
}

/// Builder for [`DriveConfig`].
#[derive(Debug, Default)]
pub struct DriveConfigBuilder {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    default_fields: Option<String>,
    spaces: Option<String>,
    max_depth: Option<u32>,
    max_pages: Option<u32>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
}

impl DriveConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Field selector: comma-joined names or `*`
    pub fn default_fields(mut self, fields: impl Into<String>) -> Self {
        self.default_fields = Some(fields.into());
        self
    }

    pub fn spaces(mut self, spaces: impl Into<String>) -> Self {
        self.spaces = Some(spaces.into());
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a value is out of range.
    pub fn build(self) -> Result<DriveConfig> {
        let defaults = DriveConfig::default();

        let api_base_url = self
            .api_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !(api_base_url.starts_with("https://") || api_base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                api_base_url
            )));
        }

        let page_size = self.page_size.unwrap_or(defaults.page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        let default_fields = self.default_fields.unwrap_or(defaults.default_fields);
        if default_fields.trim().is_empty() {
            return Err(Error::Config(
                "default_fields must not be empty; use \"*\" for all fields".to_string(),
            ));
        }

        let spaces = self.spaces.unwrap_or(defaults.spaces);
        if spaces.trim().is_empty() {
            return Err(Error::Config("spaces must not be empty".to_string()));
        }

        let max_pages = self.max_pages.unwrap_or(defaults.max_pages);
        if max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".to_string()));
        }

        let max_retries = self.max_retries.unwrap_or(defaults.max_retries);

        let request_timeout = self.request_timeout.unwrap_or(defaults.request_timeout);
        if request_timeout.is_zero() {
            return Err(Error::Config("request_timeout must be non-zero".to_string()));
        }

        Ok(DriveConfig {
            api_base_url,
            page_size,
            default_fields,
            spaces,
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            max_pages,
            request_timeout,
            max_retries,
            retry_base_delay: self.retry_base_delay.unwrap_or(defaults.retry_base_delay),
        })
    }
}
