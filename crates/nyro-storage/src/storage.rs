//! Storage trait and error types.
//!
//! # Path Convention
//!
//! Every path parameter is relative to the content root and names a file:
//! - `"docs/overview.md"` - a documentation page
//! - `"docs/api/rest.md"` - a nested documentation page
//! - `"CHANGELOG.md"` - the changelog
//!
//! Paths containing `..` are rejected with [`StorageErrorKind::InvalidPath`].

use std::path::{Path, PathBuf};

use crate::event::{StorageEventReceiver, WatchHandle};

/// A markdown document found by [`Storage::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the content root (e.g., `docs/api/rest.md`).
    pub path: PathBuf,
}

/// What went wrong, independent of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    /// Path escapes the content root or is otherwise unusable.
    InvalidPath,
    Timeout,
    Other,
}

impl StorageErrorKind {
    fn label(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::InvalidPath => "invalid path",
            Self::Timeout => "timed out",
            Self::Other => "storage error",
        }
    }
}

impl From<std::io::ErrorKind> for StorageErrorKind {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::InvalidInput => Self::InvalidPath,
            std::io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Other,
        }
    }
}

/// Failure reading the content store.
#[derive(Debug)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    /// Content-relative path the operation was for.
    pub path: Option<PathBuf>,
    /// Backend name, e.g. `"Fs"` or `"Mock"`.
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Classify an I/O error by its kind and keep it as the source.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        Self {
            kind: err.kind().into(),
            path,
            backend: None,
            source: Some(Box::new(err)),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether the content is absent from the site's point of view.
    ///
    /// Invalid paths count as absent so that a request for `../secret`
    /// looks the same as one for a missing page.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::NotFound | StorageErrorKind::InvalidPath
        )
    }
}

impl std::fmt::Display for StorageError {
    /// `docs/api/rest.md: not found: <source> [Fs]`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: ", path.display())?;
        }
        f.write_str(self.kind.label())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(backend) = self.backend {
            write!(f, " [{backend}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

/// Read-only access to the site's static content.
///
/// Implementations map content-relative file paths to their backing store.
pub trait Storage: Send + Sync {
    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist, the path is
    /// invalid, or it can't be read.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Read a file as raw bytes (images and other non-markdown assets).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.read(path).map(String::into_bytes)
    }

    /// Check if a file exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &Path) -> bool;

    /// Get modification time as seconds since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or mtime can't be retrieved.
    fn mtime(&self, path: &Path) -> Result<f64, StorageError>;

    /// List markdown documents below `dir`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the listing fails.
    fn scan(&self, dir: &Path) -> Result<Vec<Document>, StorageError>;

    /// Start watching for content changes.
    ///
    /// Returns a receiver for events and a handle to stop watching.
    /// Default implementation returns a no-op receiver for backends
    /// that don't support change notification.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if watching cannot be started.
    fn watch(&self) -> Result<(StorageEventReceiver, WatchHandle), StorageError> {
        Ok((StorageEventReceiver::closed(), WatchHandle::detached()))
    }
}
