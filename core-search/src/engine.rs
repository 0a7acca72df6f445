//! # Listing Engine
//!
//! Drives cursor-based pagination against a [`RemoteLister`] and, when asked,
//! descends into every folder it finds.
//!
//! ## Sessions
//!
//! One top-level call is a listing. Each listing runs one session for the
//! caller's query and, in recursive mode, one further session per folder,
//! scoped by `'<folderId>' in parents`. Folder sessions filter by parent only
//! and do not reuse the caller's clauses or combinator.
//!
//! Sessions run one after another. Results are ordered depth-first: a
//! session's own entities in page order, then each of its folders' results
//! in the order the folders were encountered.
//!
//! ## Guards
//!
//! - A cursor the session has already sent ends paging for that session.
//! - At most `max_pages` fetches per session.
//! - A folder ID is descended into at most once per listing. Folders named
//!   by a top-level `'<id>' in parents` clause count as already listed.
//! - Folders deeper than `max_depth` are reported and skipped.
//!
//! ## Failure
//!
//! A transport error or cancellation fails the whole listing. Entities
//! gathered so far are dropped and only their count is reported.

use std::collections::HashSet;
use std::sync::Arc;

use bridge_traits::listing::{Entity, ListRequest, RemoteLister, ALL_FIELDS};
use core_runtime::config::{DriveConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};
use core_runtime::events::{ListingEvent, SkipReason};
use core_runtime::logging::redact_query;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::clause::Clause;
use crate::error::{Result, SearchError};
use crate::observer::{ListingObserver, NoopObserver};
use crate::query::{Combinator, Query};
use crate::search_terms::in_parents;

/// Safety limits applied to every listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Deepest folder level descended into; 0 lists the top level only
    pub max_depth: u32,
    /// Page fetches per session
    pub max_pages: u32,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl From<&DriveConfig> for EngineLimits {
    fn from(config: &DriveConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages,
        }
    }
}

/// Per-call listing options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Operator joining the caller's clauses
    pub combinator: Combinator,
    /// Field selector; the engine default when `None`
    pub fields: Option<String>,
    /// Descend into folders
    pub recursive: bool,
    /// Overrides [`EngineLimits::max_depth`] for this call
    pub max_depth: Option<u32>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Comma-joined field names or `*`
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Paginating, optionally recursive lister.
pub struct ListingEngine<L: RemoteLister + ?Sized> {
    lister: Arc<L>,
    observer: Arc<dyn ListingObserver>,
    limits: EngineLimits,
    default_fields: String,
}

impl<L: RemoteLister + ?Sized> Clone for ListingEngine<L> {
    fn clone(&self) -> Self {
        Self {
            lister: Arc::clone(&self.lister),
            observer: Arc::clone(&self.observer),
            limits: self.limits,
            default_fields: self.default_fields.clone(),
        }
    }
}

impl<L: RemoteLister + ?Sized> ListingEngine<L> {
    pub fn new(lister: Arc<L>) -> Self {
        Self {
            lister,
            observer: Arc::new(NoopObserver),
            limits: EngineLimits::default(),
            default_fields: ALL_FIELDS.to_string(),
        }
    }

    /// Engine with limits and default fields taken from the client config
    pub fn from_config(lister: Arc<L>, config: &DriveConfig) -> Self {
        Self::new(lister)
            .with_limits(EngineLimits::from(config))
            .with_default_fields(config.default_fields.clone())
    }

    pub fn with_observer(mut self, observer: Arc<dyn ListingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_limits(mut self, limits: EngineLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_default_fields(mut self, fields: impl Into<String>) -> Self {
        self.default_fields = fields.into();
        self
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// List every entity matching the clauses
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidInput`] for an empty field selector
    /// - [`SearchError::Transport`] when any remote call fails
    ///
    /// A session that reaches [`EngineLimits::max_pages`] is not an error:
    /// it stops paging, logs a warning, reports
    /// [`ListingEvent::PageLimitReached`], and its results so far are kept.
    pub async fn list(&self, clauses: &[Clause], options: &ListOptions) -> Result<Vec<Entity>> {
        self.list_with_cancel(clauses, options, &CancellationToken::new())
            .await
    }

    /// [`list`](Self::list), stopping early once `cancel` fires
    ///
    /// Cancellation is observed before each page fetch and before each
    /// folder session; a fetch already in flight runs to completion.
    #[instrument(
        skip(self, clauses, options, cancel),
        fields(clauses = clauses.len(), recursive = options.recursive)
    )]
    pub async fn list_with_cancel(
        &self,
        clauses: &[Clause],
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entity>> {
        let fields = options
            .fields
            .clone()
            .unwrap_or_else(|| self.default_fields.clone());
        if fields.trim().is_empty() {
            return Err(SearchError::invalid_input(
                "field selector must not be empty; use \"*\" for all fields",
            ));
        }
        if options.recursive && !selects_folder_fields(&fields) {
            warn!(
                fields = %fields,
                "Recursive listing without id and mimeType in the field selector will not find folders"
            );
        }

        let query = Query::new(clauses.to_vec(), options.combinator).render();
        let mut listing = Listing {
            id: Uuid::new_v4().to_string(),
            fields,
            max_depth: options.max_depth.unwrap_or(self.limits.max_depth),
            results: Vec::new(),
            // Folders the caller scoped to are listed by the top-level session
            visited: clauses.iter().filter_map(Clause::parent_scope).collect(),
        };

        match self.run(&mut listing, query, options.recursive, cancel).await {
            Ok(()) => {
                self.emit(ListingEvent::SessionCompleted {
                    listing_id: listing.id.clone(),
                    total: listing.results.len() as u64,
                });
                Ok(listing.results)
            }
            Err(error) => {
                let event = match &error {
                    SearchError::Cancelled { discarded } => ListingEvent::SessionCancelled {
                        listing_id: listing.id.clone(),
                        discarded: *discarded,
                    },
                    other => ListingEvent::SessionFailed {
                        listing_id: listing.id.clone(),
                        message: other.to_string(),
                        discarded: other.discarded(),
                    },
                };
                self.emit(event);
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        listing: &mut Listing,
        query: Option<String>,
        recursive: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let root_folders = self.session(listing, query, 0, cancel).await?;
        if !recursive {
            return Ok(());
        }

        // Depth-first: the last pushed folder is listed next
        let mut pending: Vec<(String, u32)> = Vec::new();
        self.schedule(listing, root_folders, 1, &mut pending);

        while let Some((folder_id, depth)) = pending.pop() {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled {
                    discarded: listing.results.len() as u64,
                });
            }

            self.emit(ListingEvent::RecursionEntered {
                listing_id: listing.id.clone(),
                folder_id: folder_id.clone(),
                depth,
            });
            let scope = in_parents(&folder_id).into_string();
            let folders = self.session(listing, Some(scope), depth, cancel).await?;
            self.schedule(listing, folders, depth + 1, &mut pending);
        }

        Ok(())
    }

    /// Queue folders for descent at `depth`, preserving encounter order
    fn schedule(
        &self,
        listing: &mut Listing,
        folders: Vec<String>,
        depth: u32,
        pending: &mut Vec<(String, u32)>,
    ) {
        let mut accepted = Vec::with_capacity(folders.len());
        for folder_id in folders {
            let reason = if listing.visited.contains(&folder_id) {
                Some(SkipReason::AlreadyVisited)
            } else if depth > listing.max_depth {
                Some(SkipReason::DepthLimit)
            } else {
                None
            };

            match reason {
                Some(reason) => self.emit(ListingEvent::FolderSkipped {
                    listing_id: listing.id.clone(),
                    folder_id,
                    reason,
                }),
                None => {
                    listing.visited.insert(folder_id.clone());
                    accepted.push((folder_id, depth));
                }
            }
        }
        pending.extend(accepted.into_iter().rev());
    }

    /// Page through one query, appending to the listing.
    ///
    /// Returns the IDs of folders found, in encounter order.
    async fn session(
        &self,
        listing: &mut Listing,
        query: Option<String>,
        depth: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        self.emit(ListingEvent::SessionStarted {
            listing_id: listing.id.clone(),
            query: query.as_deref().map(redact_query),
            depth,
        });

        let max_pages = self.limits.max_pages.max(1);
        let mut folders = Vec::new();
        let mut sent_cursors: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled {
                    discarded: listing.results.len() as u64,
                });
            }
            if pages >= max_pages {
                warn!(
                    listing_id = %listing.id,
                    depth,
                    pages,
                    "Page limit reached, results for this session are truncated"
                );
                self.emit(ListingEvent::PageLimitReached {
                    listing_id: listing.id.clone(),
                    depth,
                    pages,
                });
                break;
            }

            let request =
                ListRequest::new(query.clone(), listing.fields.clone()).with_page_token(cursor.clone());
            let page = self
                .lister
                .list(request)
                .await
                .map_err(|source| SearchError::Transport {
                    discarded: listing.results.len() as u64,
                    source,
                })?;
            pages += 1;

            self.emit(ListingEvent::PageFetched {
                listing_id: listing.id.clone(),
                depth,
                page: pages,
                entities: page.entities.len() as u64,
                has_more: page.has_more(),
            });

            for entity in page.entities {
                let is_folder = entity.is_folder();
                self.emit(ListingEvent::EntityFound {
                    listing_id: listing.id.clone(),
                    entity_id: entity.id().map(str::to_string),
                    name: entity.name().map(str::to_string),
                    is_folder,
                });
                if is_folder {
                    if let Some(id) = entity.id() {
                        folders.push(id.to_string());
                    }
                }
                listing.results.push(entity);
            }

            match page.next_cursor {
                None => break,
                Some(next) => {
                    if let Some(sent) = cursor.take() {
                        sent_cursors.insert(sent);
                    }
                    if sent_cursors.contains(&next) {
                        self.emit(ListingEvent::CursorRepeated {
                            listing_id: listing.id.clone(),
                            depth,
                            page: pages,
                        });
                        break;
                    }
                    cursor = Some(next);
                }
            }
        }

        Ok(folders)
    }

    fn emit(&self, event: ListingEvent) {
        self.observer.on_event(&event);
    }
}

/// State owned by one top-level call
struct Listing {
    id: String,
    fields: String,
    max_depth: u32,
    results: Vec<Entity>,
    /// Folders already scheduled for descent
    visited: HashSet<String>,
}

fn selects_folder_fields(fields: &str) -> bool {
    let names: Vec<&str> = fields.split(',').map(str::trim).collect();
    names.contains(&ALL_FIELDS) || (names.contains(&"id") && names.contains(&"mimeType"))
}
