//! Simple Drive workspace facade.
//!
//! Re-exports the workspace crates so host applications can depend on a
//! single package. The `desktop-shims` feature (on by default) pulls in the
//! `reqwest`-backed transport from `bridge-desktop`.
//!
//! ```ignore
//! use simple_drive::core_search::search_terms::{in_parents, trashed};
//! use simple_drive::core_search::ListOptions;
//! use simple_drive::provider_google_drive::Drive;
//!
//! let files = drive
//!     .files()
//!     .list(&[in_parents("folder-id"), trashed(false)], &ListOptions::new())
//!     .await?;
//! ```

pub use bridge_traits;
pub use core_runtime;
pub use core_search;
pub use provider_google_drive;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
