//! Listing progress observers
//!
//! The engine never prints. It reports structured [`ListingEvent`]s to an
//! injected observer and the host decides what to do with them.

use core_runtime::events::{CoreEvent, EventBus, ListingEvent};
use tracing::{debug, info, trace, warn};

/// Receives every event of a listing call, in order.
///
/// Called inline from the engine; implementations should return quickly.
pub trait ListingObserver: Send + Sync {
    fn on_event(&self, event: &ListingEvent);
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ListingObserver for NoopObserver {
    fn on_event(&self, _event: &ListingEvent) {}
}

/// Logs events through `tracing`.
///
/// Entity-level events go to `trace`, page-level to `debug`, session
/// outcomes to `info`, and guard trips to `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ListingObserver for TracingObserver {
    fn on_event(&self, event: &ListingEvent) {
        match event {
            ListingEvent::SessionStarted {
                listing_id,
                query,
                depth,
            } => debug!(
                listing_id = %listing_id,
                depth,
                query = query.as_deref().unwrap_or("<none>"),
                "Listing session started"
            ),
            ListingEvent::PageFetched {
                listing_id,
                depth,
                page,
                entities,
                has_more,
            } => debug!(
                listing_id = %listing_id,
                depth,
                page,
                entities,
                has_more,
                "Fetched page"
            ),
            ListingEvent::EntityFound {
                listing_id,
                entity_id,
                name,
                is_folder,
            } => trace!(
                listing_id = %listing_id,
                entity_id = entity_id.as_deref().unwrap_or("?"),
                name = name.as_deref().unwrap_or("?"),
                is_folder,
                "Found entity"
            ),
            ListingEvent::RecursionEntered {
                listing_id,
                folder_id,
                depth,
            } => debug!(listing_id = %listing_id, folder_id = %folder_id, depth, "Entering folder"),
            ListingEvent::FolderSkipped {
                listing_id,
                folder_id,
                reason,
            } => debug!(listing_id = %listing_id, folder_id = %folder_id, reason = %reason, "Skipping folder"),
            ListingEvent::CursorRepeated {
                listing_id,
                depth,
                page,
            } => warn!(
                listing_id = %listing_id,
                depth,
                page,
                "Remote repeated its continuation cursor, stopping pagination"
            ),
            ListingEvent::PageLimitReached {
                listing_id,
                depth,
                pages,
            } => warn!(listing_id = %listing_id, depth, pages, "Page limit reached, stopping pagination"),
            ListingEvent::SessionCompleted { listing_id, total } => {
                info!(listing_id = %listing_id, total, "Listing completed")
            }
            ListingEvent::SessionFailed {
                listing_id,
                message,
                discarded,
            } => warn!(listing_id = %listing_id, discarded, error = %message, "Listing failed"),
            ListingEvent::SessionCancelled {
                listing_id,
                discarded,
            } => info!(listing_id = %listing_id, discarded, "Listing cancelled"),
        }
    }
}

/// Publishes events on the runtime [`EventBus`] as [`CoreEvent::Listing`].
#[derive(Debug, Clone)]
pub struct EventBusObserver {
    bus: EventBus,
}

impl EventBusObserver {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl ListingObserver for EventBusObserver {
    fn on_event(&self, event: &ListingEvent) {
        // No subscribers is not an error
        let _ = self.bus.emit(CoreEvent::Listing(event.clone()));
    }
}
