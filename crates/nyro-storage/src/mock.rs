//! In-memory storage for tests.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{RwLock, mpsc};

use crate::event::{StorageEvent, StorageEventKind, StorageEventReceiver, WatchHandle};
use crate::storage::{Document, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores file contents in memory. Content can be changed after construction
/// with [`set_content`](Self::set_content) and [`remove`](Self::remove) to
/// simulate edits, and change events can be pushed with [`emit`](Self::emit)
/// once [`watch`](Storage::watch) has been called.
///
/// Lock poisoning panics: this type only backs tests.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use nyro_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("docs/overview.md", "# Overview");
///
/// let content = storage.read(Path::new("docs/overview.md")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<PathBuf, MockFile>>,
    event_sender: RwLock<Option<mpsc::Sender<StorageEvent>>>,
}

/// What the mock knows about one path.
#[derive(Debug, Default)]
struct MockFile {
    content: Option<String>,
    mtime: Option<f64>,
    /// Error returned by reads, taking precedence over `content`.
    failure: Option<StorageErrorKind>,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.set_content(path, content);
        self
    }

    /// Set modification time for a path (seconds since Unix epoch).
    #[must_use]
    pub fn with_mtime(self, path: impl Into<PathBuf>, mtime: f64) -> Self {
        self.update(path, |file| file.mtime = Some(mtime));
        self
    }

    /// Make reads of `path` fail with a permission error.
    #[must_use]
    pub fn with_permission_denied(self, path: impl Into<PathBuf>) -> Self {
        self.update(path, |file| {
            file.failure = Some(StorageErrorKind::PermissionDenied);
        });
        self
    }

    /// Make reads of `path` fail with a timeout.
    #[must_use]
    pub fn with_timeout(self, path: impl Into<PathBuf>) -> Self {
        self.update(path, |file| file.failure = Some(StorageErrorKind::Timeout));
        self
    }

    /// Replace (or create) the content of a file.
    pub fn set_content(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let content = content.into();
        self.update(path, |file| file.content = Some(content));
    }

    /// Delete a file's content. Its mtime and injected failure stay.
    pub fn remove(&self, path: &Path) {
        self.update(path, |file| file.content = None);
    }

    /// Emit a storage event. No-op until `watch()` has been called.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn emit(&self, path: impl Into<PathBuf>, kind: StorageEventKind) {
        if let Some(sender) = self.event_sender.read().unwrap().as_ref() {
            let _ = sender.send(StorageEvent::new(path, kind));
        }
    }

    fn update(&self, path: impl Into<PathBuf>, change: impl FnOnce(&mut MockFile)) {
        change(self.files.write().unwrap().entry(path.into()).or_default());
    }

    fn error(kind: StorageErrorKind, path: &Path) -> StorageError {
        StorageError::new(kind).with_path(path).with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &Path) -> Result<String, StorageError> {
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Self::error(StorageErrorKind::InvalidPath, path));
        }
        let files = self.files.read().unwrap();
        let file = files.get(path);
        if let Some(kind) = file.and_then(|f| f.failure) {
            return Err(Self::error(kind, path));
        }
        file.and_then(|f| f.content.clone())
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .get(path)
            .is_some_and(|f| f.content.is_some())
    }

    fn mtime(&self, path: &Path) -> Result<f64, StorageError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(MockFile {
                mtime: Some(mtime), ..
            }) => Ok(*mtime),
            Some(MockFile {
                content: Some(_), ..
            }) => Ok(0.0),
            _ => Err(StorageError::not_found(path).with_backend(BACKEND)),
        }
    }

    fn scan(&self, dir: &Path) -> Result<Vec<Document>, StorageError> {
        let mut documents: Vec<Document> = self
            .files
            .read()
            .unwrap()
            .iter()
            .filter(|(path, file)| {
                file.content.is_some()
                    && path.starts_with(dir)
                    && path.extension().is_some_and(|e| e == "md")
            })
            .map(|(path, _)| Document { path: path.clone() })
            .collect();
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(documents)
    }

    fn watch(&self) -> Result<(StorageEventReceiver, WatchHandle), StorageError> {
        let (tx, rx) = mpsc::channel();
        *self.event_sender.write().unwrap() = Some(tx);
        Ok((StorageEventReceiver::new(rx), WatchHandle::detached()))
    }
}
