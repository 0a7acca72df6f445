//! `Drive` facade
//!
//! Owns the connector and the listing engine and hands out one borrowed
//! surface per API resource.

use std::sync::Arc;

use bridge_traits::http::HttpClient;
use core_runtime::config::DriveConfig;
use core_runtime::events::{CoreEvent, DriveEvent, EventBus};
use core_search::{EventBusObserver, ListingEngine, ListingObserver, TracingObserver};

use crate::about::About;
use crate::comments::Comments;
use crate::connector::GoogleDriveConnector;
use crate::files::Files;
use crate::permissions::Permissions;
use crate::replies::Replies;
use crate::revisions::Revisions;

/// Google Drive client.
///
/// ```ignore
/// use provider_google_drive::Drive;
/// use core_search::search_terms::{name_contains, trashed};
/// use core_search::ListOptions;
///
/// let drive = Drive::new(http_client, token, DriveConfig::default());
/// let reports = drive
///     .files()
///     .list(&[name_contains("report"), trashed(false)], &ListOptions::default())
///     .await?;
/// let quota = drive.about().storage_quota().await?;
/// ```
pub struct Drive {
    connector: Arc<GoogleDriveConnector>,
    engine: ListingEngine<GoogleDriveConnector>,
    events: Option<EventBus>,
}

impl Drive {
    /// Client that logs listing progress through `tracing`
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        access_token: impl Into<String>,
        config: DriveConfig,
    ) -> Self {
        let connector = Arc::new(GoogleDriveConnector::new(http_client, access_token, config));
        Self::from_connector(connector)
    }

    pub fn from_connector(connector: Arc<GoogleDriveConnector>) -> Self {
        let engine = ListingEngine::from_config(Arc::clone(&connector), connector.config())
            .with_observer(Arc::new(TracingObserver));
        Self {
            connector,
            engine,
            events: None,
        }
    }

    /// Publish listing progress and mutations on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.engine = self
            .engine
            .with_observer(Arc::new(EventBusObserver::new(bus.clone())));
        self.events = Some(bus);
        self
    }

    /// Replace the listing observer
    pub fn with_observer(mut self, observer: Arc<dyn ListingObserver>) -> Self {
        self.engine = self.engine.with_observer(observer);
        self
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    pub fn permissions(&self) -> Permissions<'_> {
        Permissions::new(self)
    }

    pub fn comments(&self) -> Comments<'_> {
        Comments::new(self)
    }

    pub fn replies(&self) -> Replies<'_> {
        Replies::new(self)
    }

    pub fn revisions(&self) -> Revisions<'_> {
        Revisions::new(self)
    }

    pub fn about(&self) -> About<'_> {
        About::new(self)
    }

    pub fn connector(&self) -> &Arc<GoogleDriveConnector> {
        &self.connector
    }

    pub fn engine(&self) -> &ListingEngine<GoogleDriveConnector> {
        &self.engine
    }

    pub(crate) fn emit(&self, event: DriveEvent) {
        if let Some(bus) = &self.events {
            // No subscribers is not an error
            let _ = bus.emit(CoreEvent::Drive(event));
        }
    }
}
