//! # Desktop Bridge Implementations
//!
//! Default transport for desktop hosts (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with rustls, connection pooling and
//!   exponential backoff on 429/5xx responses
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let connector = GoogleDriveConnector::new(http_client, access_token, DriveConfig::default());
//! ```

mod http;

pub use http::ReqwestHttpClient;
