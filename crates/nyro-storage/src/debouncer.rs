//! Event debouncing for change notification.
//!
//! Editors typically emit several filesystem events per save. The debouncer
//! folds them into one event per path once the path has been quiet for the
//! debounce window.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::event::{StorageEvent, StorageEventKind};

struct PendingEvent {
    kind: StorageEventKind,
    deadline: Instant,
}

/// Thread-safe event debouncer keyed by path.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, PendingEvent>>,
    window: Duration,
}

impl EventDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record an event, merging it with any pending event for the same path.
    ///
    /// Every event restarts the path's quiet window.
    pub(crate) fn record(&self, path: PathBuf, kind: StorageEventKind) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = Instant::now() + self.window;

        let merged = match pending.get(&path) {
            Some(earlier) => merge(earlier.kind, kind),
            None => Some(kind),
        };
        match merged {
            Some(kind) => {
                pending.insert(path, PendingEvent { kind, deadline });
            }
            None => {
                pending.remove(&path);
            }
        }
    }

    /// Remove and return events whose window has passed, ordered by path.
    pub(crate) fn drain_ready(&self) -> Vec<StorageEvent> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let mut events: Vec<StorageEvent> = pending
            .extract_if(|_, event| event.deadline <= now)
            .map(|(path, event)| StorageEvent::new(path, event.kind))
            .collect();
        events.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        events
    }
}

/// Net effect of `earlier` followed by `later`; `None` when they cancel out.
#[allow(clippy::match_same_arms)]
fn merge(earlier: StorageEventKind, later: StorageEventKind) -> Option<StorageEventKind> {
    use StorageEventKind::{Created, Modified, Removed};

    match (earlier, later) {
        // Created then removed inside the window: nothing happened
        (Created, Removed) => None,
        (Created, Created | Modified) | (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
        // Replaced by a new file
        (Removed, Created) => Some(Modified),
        (Modified | Removed, Removed) | (Removed, Modified) => Some(Removed),
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const WINDOW: Duration = Duration::from_millis(10);

    fn settle() {
        thread::sleep(Duration::from_millis(20));
    }

    #[test]
    fn test_single_event_emitted_after_deadline() {
        let debouncer = EventDebouncer::new(WINDOW);
        let path = PathBuf::from("/site/public/docs/overview.md");

        debouncer.record(path.clone(), StorageEventKind::Modified);
        assert!(debouncer.drain_ready().is_empty());

        settle();

        let events = debouncer.drain_ready();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].path, path);
        assert_eq!(events[0].kind, StorageEventKind::Modified);
        assert!(debouncer.drain_ready().is_empty());
    }

    #[test]
    fn test_editor_save_burst_coalesces() {
        let debouncer = EventDebouncer::new(WINDOW);
        let path = PathBuf::from("/site/public/CHANGELOG.md");

        debouncer.record(path.clone(), StorageEventKind::Removed);
        debouncer.record(path.clone(), StorageEventKind::Created);
        debouncer.record(path, StorageEventKind::Modified);

        settle();

        let events = debouncer.drain_ready();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, StorageEventKind::Modified);
    }

    #[test]
    fn test_created_then_removed_discards_both() {
        let debouncer = EventDebouncer::new(WINDOW);
        let path = PathBuf::from("/site/public/docs/tmp.md");

        debouncer.record(path.clone(), StorageEventKind::Created);
        debouncer.record(path, StorageEventKind::Removed);

        settle();

        assert!(debouncer.drain_ready().is_empty());
    }

    #[test]
    fn test_paths_are_independent_and_sorted() {
        let debouncer = EventDebouncer::new(WINDOW);

        debouncer.record(PathBuf::from("b.md"), StorageEventKind::Modified);
        debouncer.record(PathBuf::from("a.md"), StorageEventKind::Created);

        settle();

        let events = debouncer.drain_ready();
        let paths: Vec<_> = events.iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
    }

    #[test]
    fn test_merge() {
        use StorageEventKind::{Created, Modified, Removed};

        let cases = [
            (Created, Created, Some(Created)),
            (Created, Modified, Some(Created)),
            (Created, Removed, None),
            (Modified, Created, Some(Created)),
            (Modified, Modified, Some(Modified)),
            (Modified, Removed, Some(Removed)),
            (Removed, Created, Some(Modified)),
            (Removed, Modified, Some(Removed)),
            (Removed, Removed, Some(Removed)),
        ];
        for (earlier, later, expected) in cases {
            assert_eq!(merge(earlier, later), expected, "{earlier:?} then {later:?}");
        }
    }
}
