//! Change notifications from [`Storage::watch`](crate::Storage::watch).

use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageEventKind {
    Created,
    Modified,
    Removed,
}

/// A changed file under the content root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    /// Content-relative path, e.g. `docs/overview.md`.
    pub path: PathBuf,
    pub kind: StorageEventKind,
}

impl StorageEvent {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: StorageEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Blocking stream of change events.
///
/// Iterating blocks until the next event and ends once the watcher is gone.
pub struct StorageEventReceiver {
    rx: mpsc::Receiver<StorageEvent>,
}

impl StorageEventReceiver {
    /// Wrap the receiving end of a backend's event channel.
    #[must_use]
    pub fn new(rx: mpsc::Receiver<StorageEvent>) -> Self {
        Self { rx }
    }

    /// Wait up to `timeout` for the next event.
    #[cfg(test)]
    pub(crate) fn recv_timeout(&self, timeout: std::time::Duration) -> Option<StorageEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Receiver for backends without change notification.
    pub(crate) fn closed() -> Self {
        let (_tx, rx) = mpsc::channel();
        Self { rx }
    }
}

impl Iterator for StorageEventReceiver {
    type Item = StorageEvent;

    fn next(&mut self) -> Option<StorageEvent> {
        self.rx.recv().ok()
    }
}

/// Keeps a watcher alive. Dropping it (or calling [`stop`](Self::stop))
/// disconnects the shutdown channel and the watcher thread exits.
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    #[must_use]
    pub fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: Some(shutdown),
        }
    }

    /// Stop watching now instead of at drop.
    pub fn stop(self) {}

    pub(crate) fn detached() -> Self {
        Self { _shutdown: None }
    }
}
