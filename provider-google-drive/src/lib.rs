//! # Google Drive Provider
//!
//! Google Drive API v3 client built on the `HttpClient` bridge.
//!
//! ## Overview
//!
//! This module provides:
//! - [`GoogleDriveConnector`], the `RemoteLister` behind paginated listing
//! - [`Drive`], a facade over files, permissions, comments, replies,
//!   revisions and account information
//! - Recursive listing through the `core-search` engine, with events
//!   published on an optional `EventBus`

pub mod about;
pub mod comments;
pub mod connector;
pub mod drive;
pub mod error;
pub mod files;
pub mod permissions;
pub mod replies;
pub mod revisions;
pub mod types;

pub use connector::GoogleDriveConnector;
pub use drive::Drive;
pub use error::{GoogleDriveError, Result};
pub use files::{ContentRestriction, CopyOptions, DEFAULT_FILE_FIELDS};
pub use permissions::{Grantee, PermissionSelector};
pub use types::{Comment, Permission, Reply, Revision, StorageQuota, User};
