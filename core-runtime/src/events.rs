//! # Event Bus System
//!
//! Typed events published over `tokio::sync::broadcast` so the host can
//! decide what to render, instead of the client printing as it goes.
//!
//! ## Overview
//!
//! - **Event Types**: [`ListingEvent`] for search sessions, [`DriveEvent`]
//!   for single-entity mutations, wrapped in [`CoreEvent`]
//! - **EventBus**: cloneable broadcast sender
//! - **Subscriptions**: every subscriber gets every event emitted after it
//!   subscribed
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, ListingEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(64);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(CoreEvent::Listing(ListingEvent::SessionCompleted {
//!     listing_id: "l-1".to_string(),
//!     total: 3,
//! }))
//! .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.description(), "Listing completed");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell `n` events behind. It can
//!   keep receiving.
//! - **`RecvError::Closed`**: every sender was dropped.
//!
//! `emit` fails only when nobody is subscribed; publishers ignore that.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

/// Top-level event enum published through the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Search and listing progress
    Listing(ListingEvent),
    /// Single-entity changes made through the client
    Drive(DriveEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Listing(e) => e.description(),
            CoreEvent::Drive(e) => e.description(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Listing(ListingEvent::SessionFailed { .. }) => EventSeverity::Error,
            CoreEvent::Listing(ListingEvent::CursorRepeated { .. })
            | CoreEvent::Listing(ListingEvent::PageLimitReached { .. })
            | CoreEvent::Listing(ListingEvent::FolderSkipped { .. }) => EventSeverity::Warning,
            CoreEvent::Listing(ListingEvent::SessionCompleted { .. })
            | CoreEvent::Listing(ListingEvent::SessionCancelled { .. })
            | CoreEvent::Drive(_) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Listing Events
// ============================================================================

/// Why a discovered folder was not descended into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipReason {
    /// The folder was already listed earlier in the same call
    AlreadyVisited,
    /// Descending would exceed the configured depth
    DepthLimit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyVisited => write!(f, "already visited"),
            SkipReason::DepthLimit => write!(f, "depth limit"),
        }
    }
}

/// Events emitted by one top-level listing call.
///
/// `listing_id` is shared by the top-level session and every folder
/// sub-session it spawns; `depth` is 0 for the top level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ListingEvent {
    /// A session began issuing page requests.
    SessionStarted {
        listing_id: String,
        /// Query string with emails masked, `None` when unfiltered
        query: Option<String>,
        depth: u32,
    },
    /// One page came back.
    PageFetched {
        listing_id: String,
        depth: u32,
        /// 1-based page number within the session
        page: u32,
        entities: u64,
        has_more: bool,
    },
    /// An entity was added to the accumulated result.
    EntityFound {
        listing_id: String,
        entity_id: Option<String>,
        name: Option<String>,
        is_folder: bool,
    },
    /// A sub-session scoped to a folder is starting.
    RecursionEntered {
        listing_id: String,
        folder_id: String,
        depth: u32,
    },
    /// A folder was not descended into.
    FolderSkipped {
        listing_id: String,
        folder_id: String,
        reason: SkipReason,
    },
    /// The remote handed back the cursor it was just given; paging stopped.
    CursorRepeated { listing_id: String, depth: u32, page: u32 },
    /// The session hit its page cap; paging stopped.
    PageLimitReached { listing_id: String, depth: u32, pages: u32 },
    /// The whole call finished.
    SessionCompleted { listing_id: String, total: u64 },
    /// The whole call failed; accumulated entities were dropped.
    SessionFailed {
        listing_id: String,
        message: String,
        discarded: u64,
    },
    /// The call was cancelled by the caller.
    SessionCancelled { listing_id: String, discarded: u64 },
}

impl ListingEvent {
    fn description(&self) -> &str {
        match self {
            ListingEvent::SessionStarted { .. } => "Listing started",
            ListingEvent::PageFetched { .. } => "Page fetched",
            ListingEvent::EntityFound { .. } => "Entity found",
            ListingEvent::RecursionEntered { .. } => "Entering folder",
            ListingEvent::FolderSkipped { .. } => "Folder skipped",
            ListingEvent::CursorRepeated { .. } => "Cursor repeated",
            ListingEvent::PageLimitReached { .. } => "Page limit reached",
            ListingEvent::SessionCompleted { .. } => "Listing completed",
            ListingEvent::SessionFailed { .. } => "Listing failed",
            ListingEvent::SessionCancelled { .. } => "Listing cancelled",
        }
    }

    pub fn listing_id(&self) -> &str {
        match self {
            ListingEvent::SessionStarted { listing_id, .. }
            | ListingEvent::PageFetched { listing_id, .. }
            | ListingEvent::EntityFound { listing_id, .. }
            | ListingEvent::RecursionEntered { listing_id, .. }
            | ListingEvent::FolderSkipped { listing_id, .. }
            | ListingEvent::CursorRepeated { listing_id, .. }
            | ListingEvent::PageLimitReached { listing_id, .. }
            | ListingEvent::SessionCompleted { listing_id, .. }
            | ListingEvent::SessionFailed { listing_id, .. }
            | ListingEvent::SessionCancelled { listing_id, .. } => listing_id,
        }
    }
}

// ============================================================================
// Drive Events
// ============================================================================

/// Changes made through the single-entity surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DriveEvent {
    FileCreated {
        file_id: String,
        name: String,
        mime_type: String,
        parent_id: Option<String>,
    },
    FileRenamed { file_id: String, name: String },
    FileMoved { file_id: String, folder_id: String },
    FileCopied {
        source_id: String,
        file_id: String,
        name: String,
    },
    ContentRestricted { file_id: String, read_only: bool },
    FileTrashed { file_id: String },
    FileRestored { file_id: String },
    FileDeleted { file_id: String },
    TrashEmptied,
    PermissionAdded {
        file_id: String,
        permission_id: String,
        role: String,
    },
    PermissionUpdated {
        file_id: String,
        permission_id: String,
        role: String,
    },
    PermissionRemoved { file_id: String, permission_id: String },
    OwnershipTransferred { file_id: String },
    CommentCreated { file_id: String, comment_id: String },
    CommentUpdated { file_id: String, comment_id: String },
    CommentDeleted { file_id: String, comment_id: String },
    ReplyCreated {
        file_id: String,
        comment_id: String,
        reply_id: String,
    },
    ReplyUpdated {
        file_id: String,
        comment_id: String,
        reply_id: String,
    },
    ReplyDeleted {
        file_id: String,
        comment_id: String,
        reply_id: String,
    },
    RevisionDeleted { file_id: String, revision_id: String },
}

impl DriveEvent {
    fn description(&self) -> &str {
        match self {
            DriveEvent::FileCreated { .. } => "File created",
            DriveEvent::FileRenamed { .. } => "File renamed",
            DriveEvent::FileMoved { .. } => "File moved",
            DriveEvent::FileCopied { .. } => "File copied",
            DriveEvent::ContentRestricted { .. } => "Content restriction updated",
            DriveEvent::FileTrashed { .. } => "File moved to trash",
            DriveEvent::FileRestored { .. } => "File restored from trash",
            DriveEvent::FileDeleted { .. } => "File deleted",
            DriveEvent::TrashEmptied => "Trash emptied",
            DriveEvent::PermissionAdded { .. } => "Permission added",
            DriveEvent::PermissionUpdated { .. } => "Permission updated",
            DriveEvent::PermissionRemoved { .. } => "Permission removed",
            DriveEvent::OwnershipTransferred { .. } => "Ownership transferred",
            DriveEvent::CommentCreated { .. } => "Comment created",
            DriveEvent::CommentUpdated { .. } => "Comment updated",
            DriveEvent::CommentDeleted { .. } => "Comment deleted",
            DriveEvent::ReplyCreated { .. } => "Reply created",
            DriveEvent::ReplyUpdated { .. } => "Reply updated",
            DriveEvent::ReplyDeleted { .. } => "Reply deleted",
            DriveEvent::RevisionDeleted { .. } => "Revision deleted",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast channel for [`CoreEvent`]s.
///
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event, returning how many subscribers received it.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a receiver for every event emitted from now on.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}
