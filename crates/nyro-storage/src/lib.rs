//! Content store for the NyroDB documentation site.
//!
//! The site reads two kinds of static content: markdown documents under
//! `docs/` and the top-level changelog. This crate hides where that content
//! lives behind the [`Storage`] trait.
//!
//! # Architecture
//!
//! - [`Storage`] trait with `read()`, `exists()`, `mtime()`, `scan()` and `watch()`
//! - [`FsStorage`] reads from a content directory and watches it with `notify`
//! - [`MockStorage`] keeps content in memory (behind the `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use nyro_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("public"));
//! let markdown = storage.read(Path::new("docs/overview.md"))?;
//! ```

mod debouncer;
mod event;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use event::{StorageEvent, StorageEventKind, StorageEventReceiver, WatchHandle};
pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Document, Storage, StorageError, StorageErrorKind};
