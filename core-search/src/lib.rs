//! # Drive Search
//!
//! Query construction and paginated listing for the Drive files endpoint.
//!
//! ## Overview
//!
//! Two pieces work together:
//!
//! - **Predicate builder** ([`search_terms`], [`Clause`], [`constants`]):
//!   pure functions, one per attribute and comparison, each rendering a
//!   single clause of the provider's query grammar with values escaped.
//! - **Listing engine** ([`ListingEngine`]): joins clauses with one
//!   [`Combinator`], follows continuation cursors until the remote stops
//!   issuing them, and optionally descends into every folder it finds.
//!
//! ## Example
//!
//! ```ignore
//! use core_search::constants::MimeType;
//! use core_search::search_terms::{mime_type_eq, name_contains, trashed};
//! use core_search::{ListOptions, ListingEngine};
//!
//! let engine = ListingEngine::from_config(connector, &config);
//! let sheets = engine
//!     .list(
//!         &[name_contains("budget"), mime_type_eq(MimeType::Sheets), trashed(false)],
//!         &ListOptions::new().fields("id, name, mimeType"),
//!     )
//!     .await?;
//! ```

pub mod clause;
pub mod constants;
pub mod engine;
pub mod error;
pub mod observer;
pub mod query;
pub mod search_terms;

pub use clause::Clause;
pub use engine::{EngineLimits, ListOptions, ListingEngine};
pub use error::{Result, SearchError};
pub use observer::{EventBusObserver, ListingObserver, NoopObserver, TracingObserver};
pub use query::{Combinator, Query};
