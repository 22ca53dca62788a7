//! Filesystem storage implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, UNIX_EPOCH};

use glob::Pattern;
use notify::{RecursiveMode, Watcher};

use crate::debouncer::EventDebouncer;
use crate::event::{StorageEventKind, StorageEventReceiver, WatchHandle};
use crate::storage::{Document, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Quiet period before a burst of filesystem events is reported.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Poll interval of the drain thread.
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// Filesystem storage rooted at the site's content directory.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use nyro_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("public"));
/// let changelog = storage.read(Path::new("CHANGELOG.md"))?;
/// ```
pub struct FsStorage {
    root: PathBuf,
    /// Patterns for file watching (e.g., "**/*.md").
    watch_patterns: Vec<Pattern>,
}

impl FsStorage {
    /// Create a filesystem storage watching `**/*.md`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            watch_patterns: vec![Pattern::new("**/*.md").unwrap_or_default()],
        }
    }

    /// Create a filesystem storage with custom watch patterns.
    ///
    /// An empty pattern list watches every file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] if a pattern is not a valid glob.
    pub fn with_patterns(root: PathBuf, patterns: &[String]) -> Result<Self, StorageError> {
        let watch_patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    StorageError::new(StorageErrorKind::InvalidPath)
                        .with_path(p)
                        .with_backend(BACKEND)
                        .with_source(e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root,
            watch_patterns,
        })
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject paths that could escape the content root.
    fn resolve(&self, path: &Path) -> Result<PathBuf, StorageError> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(path))
    }

    fn io_error(err: std::io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }

    /// Recursively collect markdown files below `dir`.
    fn scan_directory(&self, dir: &Path, rel: &Path, out: &mut Vec<Document>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            let path = entry.path();
            let rel_path = rel.join(&name);
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&path, &rel_path, out);
            } else if path.extension().is_some_and(|e| e == "md") {
                out.push(Document { path: rel_path });
            }
        }
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &Path) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path).map_err(|e| Self::io_error(e, path))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read(&full_path).map_err(|e| Self::io_error(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    fn mtime(&self, path: &Path) -> Result<f64, StorageError> {
        let full_path = self.resolve(path)?;
        let modified = fs::metadata(&full_path)
            .and_then(|m| m.modified())
            .map_err(|e| Self::io_error(e, path))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }

    fn scan(&self, dir: &Path) -> Result<Vec<Document>, StorageError> {
        let full_dir = self.resolve(dir)?;
        let mut documents = Vec::new();
        if full_dir.is_dir() {
            self.scan_directory(&full_dir, dir, &mut documents);
        }
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(documents)
    }

    fn watch(&self) -> Result<(StorageEventReceiver, WatchHandle), StorageError> {
        let (event_tx, event_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let debouncer = Arc::new(EventDebouncer::new(DEBOUNCE));

        // notify may report canonical paths (e.g. /private/var on macOS)
        let root = fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let patterns = self.watch_patterns.clone();
        let watcher_root = root.clone();
        let watcher_debouncer = Arc::clone(&debouncer);

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else {
                    return;
                };
                let kind = match event.kind {
                    notify::EventKind::Create(_) => StorageEventKind::Created,
                    notify::EventKind::Modify(_) => StorageEventKind::Modified,
                    notify::EventKind::Remove(_) => StorageEventKind::Removed,
                    _ => return,
                };

                for path in event.paths {
                    let Ok(rel_path) = path.strip_prefix(&watcher_root) else {
                        continue;
                    };
                    let matches = patterns.is_empty()
                        || patterns.iter().any(|p| p.matches_path(rel_path));
                    if matches {
                        watcher_debouncer.record(rel_path.to_path_buf(), kind);
                    }
                }
            })
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Other)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Other)
                    .with_path(&root)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        tracing::debug!(root = %root.display(), "Watching content directory");

        std::thread::spawn(move || {
            // The watcher stops when dropped, so it lives as long as this thread
            let _watcher = watcher;

            loop {
                match shutdown_rx.recv_timeout(DRAIN_INTERVAL) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                for event in debouncer.drain_ready() {
                    tracing::debug!(path = %event.path.display(), kind = ?event.kind, "Content changed");
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((
            StorageEventReceiver::new(event_rx),
            WatchHandle::new(shutdown_tx),
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn content_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs/api")).unwrap();
        fs::write(dir.path().join("docs/overview.md"), "# Overview\n\nNyroDB.").unwrap();
        fs::write(dir.path().join("docs/api/rest.md"), "# REST API\n\nPOST /insert").unwrap();
        fs::write(dir.path().join("docs/api/real_time.md"), "No heading here.").unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), "# Changelog").unwrap();
        dir
    }

    #[test]
    fn test_fs_storage_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FsStorage>();
    }

    #[test]
    fn test_read_existing_file() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let content = storage.read(Path::new("docs/overview.md")).unwrap();
        assert_eq!(content, "# Overview\n\nNyroDB.");
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let err = storage.read(Path::new("docs/missing.md")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.path.as_deref(), Some(Path::new("docs/missing.md")));
    }

    #[test]
    fn test_read_rejects_parent_dir() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().join("docs"));

        let err = storage.read(Path::new("../CHANGELOG.md")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_rejects_absolute_path() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let err = storage.read(Path::new("/etc/passwd")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_bytes() {
        let dir = content_dir();
        fs::write(dir.path().join("docs/logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let bytes = storage.read_bytes(Path::new("docs/logo.png")).unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_exists() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert!(storage.exists(Path::new("CHANGELOG.md")));
        assert!(!storage.exists(Path::new("docs/missing.md")));
        assert!(!storage.exists(Path::new("docs")));
        assert!(!storage.exists(Path::new("../etc/passwd")));
    }

    #[test]
    fn test_mtime() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let mtime = storage.mtime(Path::new("docs/overview.md")).unwrap();
        assert!(mtime > 0.0);
        assert!(storage.mtime(Path::new("docs/missing.md")).is_err());
    }

    #[test]
    fn test_scan_sorted() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let docs = storage.scan(Path::new("docs")).unwrap();
        assert_eq!(
            docs,
            vec![
                Document {
                    path: PathBuf::from("docs/api/real_time.md"),
                },
                Document {
                    path: PathBuf::from("docs/api/rest.md"),
                },
                Document {
                    path: PathBuf::from("docs/overview.md"),
                },
            ]
        );
    }

    #[test]
    fn test_scan_skips_hidden_and_underscore() {
        let dir = content_dir();
        fs::write(dir.path().join("docs/.draft.md"), "# Draft").unwrap();
        fs::write(dir.path().join("docs/_partial.md"), "# Partial").unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let docs = storage.scan(Path::new("docs")).unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert!(storage.scan(Path::new("docs")).unwrap().is_empty());
    }

    #[test]
    fn test_with_patterns_rejects_invalid_glob() {
        let result = FsStorage::with_patterns(PathBuf::from("public"), &["[".to_owned()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_lists_markdown_paths() {
        let dir = content_dir();
        fs::write(dir.path().join("docs/empty.md"), "").unwrap();
        fs::write(dir.path().join("docs/notes.txt"), "# Not markdown").unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let paths: Vec<_> = storage
            .scan(Path::new("docs"))
            .unwrap()
            .into_iter()
            .map(|d| d.path)
            .collect();
        assert!(paths.contains(&PathBuf::from("docs/empty.md")));
        assert!(!paths.contains(&PathBuf::from("docs/notes.txt")));
    }

    #[test]
    fn test_watch_reports_relative_paths() {
        let dir = content_dir();
        let storage = FsStorage::new(dir.path().to_path_buf());
        let (receiver, _handle) = storage.watch().unwrap();

        std::thread::sleep(Duration::from_millis(100));
        fs::write(dir.path().join("docs/overview.md"), "# Overview\n\nUpdated.").unwrap();

        let event = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("expected a change event");
        assert_eq!(event.path, PathBuf::from("docs/overview.md"));
    }
}
