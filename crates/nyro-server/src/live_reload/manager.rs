//! Live reload manager.
//!
//! Consumes debounced change events from the content store, drops cached
//! renders for the changed file and broadcasts the affected route.

use std::sync::Arc;
use std::time::Instant;

use nyro_site::Site;
use nyro_storage::{StorageError, StorageEvent, WatchHandle};
use serde::Serialize;
use tokio::sync::broadcast;

/// Route reported when a change cannot be tied to a single page.
pub(crate) const ANY_PAGE: &str = "*";

/// Event sent to connected WebSocket clients when files change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ReloadEvent {
    /// Event type (always "reload").
    #[serde(rename = "type")]
    event_type: &'static str,
    /// Route path that changed, or `*` for every page.
    path: String,
}

impl ReloadEvent {
    pub(crate) fn reload(path: impl Into<String>) -> Self {
        Self {
            event_type: "reload",
            path: path.into(),
        }
    }
}

/// Watches the content store and broadcasts reload events.
pub(crate) struct LiveReloadManager {
    site: Arc<Site>,
    broadcaster: broadcast::Sender<ReloadEvent>,
    watch_handle: Option<WatchHandle>,
}

impl LiveReloadManager {
    #[must_use]
    pub(crate) fn new(site: Arc<Site>, broadcaster: broadcast::Sender<ReloadEvent>) -> Self {
        Self {
            site,
            broadcaster,
            watch_handle: None,
        }
    }

    /// Start watching.
    ///
    /// Events are relayed on a dedicated thread until the manager is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage watcher cannot be created.
    pub(crate) fn start(&mut self) -> Result<(), StorageError> {
        let (receiver, handle) = self.site.storage().watch()?;
        self.watch_handle = Some(handle);

        let site = Arc::clone(&self.site);
        let broadcaster = self.broadcaster.clone();
        std::thread::Builder::new()
            .name("live-reload".to_owned())
            .spawn(move || {
                for event in receiver {
                    Self::handle_event(&event, &site, &broadcaster);
                }
                tracing::debug!("Live reload relay stopped");
            })
            .map_err(|e| StorageError::io(e, None))?;

        tracing::info!("Live reload enabled");
        Ok(())
    }

    /// Invalidate and broadcast one storage event.
    fn handle_event(
        event: &StorageEvent,
        site: &Site,
        broadcaster: &broadcast::Sender<ReloadEvent>,
    ) -> ReloadEvent {
        let start = Instant::now();

        let path = site.invalidate_source(&event.path).unwrap_or_else(|| {
            site.invalidate_all();
            ANY_PAGE.to_owned()
        });

        let reload_event = ReloadEvent::reload(path);
        // No subscribers is fine: nobody has the page open.
        let _ = broadcaster.send(reload_event.clone());

        tracing::info!(
            path = %reload_event.path,
            file = %event.path.display(),
            kind = ?event.kind,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Live reload event processed"
        );
        reload_event
    }

    /// Get a receiver for reload events.
    #[must_use]
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }
}

impl Drop for LiveReloadManager {
    fn drop(&mut self) {
        // Stopping the watcher closes the channel and ends the relay thread.
        if let Some(handle) = self.watch_handle.take() {
            handle.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nyro_site::{DocRoute, SiteOptions};
    use nyro_storage::{MockStorage, Storage, StorageEventKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn site_with(storage: &Arc<MockStorage>) -> Arc<Site> {
        Arc::new(Site::new(
            Arc::clone(storage) as Arc<dyn Storage>,
            SiteOptions {
                highlight: false,
                ..SiteOptions::default()
            },
        ))
    }

    fn event(path: &str) -> StorageEvent {
        StorageEvent::new(path, StorageEventKind::Modified)
    }

    #[test]
    fn test_reload_event_serialization() {
        let json = serde_json::to_value(ReloadEvent::reload("/docs/api/rest")).unwrap();

        assert_eq!(json["type"], "reload");
        assert_eq!(json["path"], "/docs/api/rest");
    }

    #[test]
    fn test_doc_change_broadcasts_route() {
        let storage = Arc::new(MockStorage::new().with_file("docs/api/rest.md", "# v1"));
        let site = site_with(&storage);
        let (tx, mut rx) = broadcast::channel(8);

        assert_eq!(
            site.render_doc(&DocRoute::from_sub_path("api/rest"))
                .title
                .as_deref(),
            Some("v1")
        );
        storage.set_content("docs/api/rest.md", "# v2");

        let sent = LiveReloadManager::handle_event(&event("docs/api/rest.md"), &site, &tx);

        assert_eq!(sent, ReloadEvent::reload("/docs/api/rest"));
        assert_eq!(rx.try_recv().unwrap(), sent);
        assert_eq!(
            site.render_doc(&DocRoute::from_sub_path("api/rest"))
                .title
                .as_deref(),
            Some("v2")
        );
    }

    #[test]
    fn test_changelog_change_broadcasts_changelog() {
        let storage = Arc::new(MockStorage::new());
        let site = site_with(&storage);
        let (tx, _rx) = broadcast::channel(8);

        let sent = LiveReloadManager::handle_event(&event("CHANGELOG.md"), &site, &tx);
        assert_eq!(sent.path, "/changelog");
    }

    #[test]
    fn test_other_file_reloads_everything() {
        let storage = Arc::new(MockStorage::new());
        let site = site_with(&storage);
        let (tx, _rx) = broadcast::channel(8);

        let sent = LiveReloadManager::handle_event(&event("docs/diagram.png"), &site, &tx);
        assert_eq!(sent.path, ANY_PAGE);
    }

    #[test]
    fn test_start_relays_storage_events() {
        let storage = Arc::new(MockStorage::new());
        let site = site_with(&storage);
        let (tx, _rx) = broadcast::channel(8);
        let mut manager = LiveReloadManager::new(site, tx);
        let mut rx = manager.subscribe();

        manager.start().unwrap();
        storage.emit("docs/overview.md", StorageEventKind::Modified);

        let received = tokio_test::block_on(async {
            tokio::time::timeout(Duration::from_secs(5), rx.recv()).await
        });
        assert_eq!(
            received.unwrap().unwrap(),
            ReloadEvent::reload("/docs/overview")
        );
    }
}
