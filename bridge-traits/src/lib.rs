//! # Host Bridge Traits
//!
//! Seams between the Drive client core and the collaborators it does not own.
//!
//! ## Overview
//!
//! The search and listing logic never talks to the network directly. It is
//! written against the traits in this crate so that hosts can plug in their
//! own transport, and so that tests can script remote behaviour page by page.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP execution with retry policy
//! - [`RemoteLister`](listing::RemoteLister) - "List entities matching a query",
//!   one page per call, driven by an opaque continuation cursor
//!
//! ## Error Handling
//!
//! All bridge traits report failures as [`BridgeError`](error::BridgeError).
//! Implementations should:
//!
//! - Convert transport-specific errors to `BridgeError`
//! - Keep the HTTP status when the remote answered with one
//! - Never include credentials in error messages
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single client can be shared
//! across tasks behind an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::listing::{ListRequest, Page, RemoteLister};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! struct EmptyDrive;
//!
//! #[async_trait]
//! impl RemoteLister for EmptyDrive {
//!     async fn list(&self, _request: ListRequest) -> Result<Page> {
//!         Ok(Page::last(Vec::new()))
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod listing;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use listing::{Entity, ListRequest, Page, RemoteLister, ALL_FIELDS, FOLDER_MIME_TYPE};
