//! Documentation sidebar tree.
//!
//! The tree is fixed at build time. Item paths are unique and double as the
//! identity used for the active item and previous/next links.

use std::collections::HashSet;
use std::fmt;

use nyro_storage::Storage;
use serde::Serialize;

use crate::route::{DEFAULT_DOC, DOCS_PREFIX, DocRoute};

/// Sidebar icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    BookOpen,
    Server,
    Settings,
    Code,
    Database,
    Cpu,
}

impl Icon {
    /// Stable kebab-case name, as used in JSON and CSS classes.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BookOpen => "book-open",
            Self::Server => "server",
            Self::Settings => "settings",
            Self::Code => "code",
            Self::Database => "database",
            Self::Cpu => "cpu",
        }
    }
}

/// A link in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: String,
    /// Route path, e.g. `/docs/api/rest`.
    pub path: String,
    pub icon: Icon,
}

impl NavItem {
    #[must_use]
    pub fn new(title: impl Into<String>, path: impl Into<String>, icon: Icon) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            icon,
        }
    }
}

/// A titled group of sidebar items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: String,
    pub items: Vec<NavItem>,
}

impl NavSection {
    #[must_use]
    pub fn new(title: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }
}

/// Neighbors of a page in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrevNext<'a> {
    pub prev: Option<&'a NavItem>,
    pub next: Option<&'a NavItem>,
}

/// Problem found by [`Navigation::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIssue {
    /// Two items share a route path.
    DuplicatePath { path: String },
    /// Item path is not a `/docs/...` route.
    InvalidPath { path: String },
    /// Source file for an item does not exist.
    MissingDocument { path: String, file: String },
    /// Markdown file under `docs/` that no item links to.
    Unlisted { file: String },
}

impl NavIssue {
    /// Whether the issue breaks a navigation invariant.
    ///
    /// Unlisted documents are still reachable by URL, so they only warn.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Unlisted { .. })
    }
}

impl fmt::Display for NavIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePath { path } => write!(f, "duplicate navigation path {path}"),
            Self::InvalidPath { path } => {
                write!(f, "navigation path {path} is not under {DOCS_PREFIX}/")
            }
            Self::MissingDocument { path, file } => {
                write!(f, "{path} points to missing document {file}")
            }
            Self::Unlisted { file } => write!(f, "{file} is not linked from the navigation"),
        }
    }
}

/// Ordered sidebar sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Navigation {
    sections: Vec<NavSection>,
}

impl Navigation {
    #[must_use]
    pub fn new(sections: Vec<NavSection>) -> Self {
        Self { sections }
    }

    /// The NyroDB documentation tree.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            NavSection::new(
                "Introduction",
                vec![NavItem::new("Overview", "/docs/overview", Icon::BookOpen)],
            ),
            NavSection::new(
                "Getting Started",
                vec![
                    NavItem::new(
                        "Installation",
                        "/docs/getting_started/installation",
                        Icon::Server,
                    ),
                    NavItem::new(
                        "Configuration",
                        "/docs/getting_started/configuration",
                        Icon::Settings,
                    ),
                ],
            ),
            NavSection::new(
                "API Reference",
                vec![
                    NavItem::new("REST API", "/docs/api/rest", Icon::Code),
                    NavItem::new("Real-Time API", "/docs/api/realtime", Icon::Database),
                ],
            ),
            NavSection::new(
                "Internals",
                vec![NavItem::new(
                    "Architecture",
                    "/docs/internals/architecture",
                    Icon::Cpu,
                )],
            ),
        ])
    }

    #[must_use]
    pub fn sections(&self) -> &[NavSection] {
        &self.sections
    }

    /// All items in reading order, ignoring section grouping.
    pub fn items(&self) -> impl Iterator<Item = &NavItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&NavItem> {
        self.items().find(|item| item.path == path)
    }

    /// Previous and next items around `current_path`.
    ///
    /// Paths that are not in the tree have neither.
    #[must_use]
    pub fn prev_next(&self, current_path: &str) -> PrevNext<'_> {
        let items: Vec<&NavItem> = self.items().collect();
        let Some(index) = items.iter().position(|item| item.path == current_path) else {
            return PrevNext {
                prev: None,
                next: None,
            };
        };

        PrevNext {
            prev: index.checked_sub(1).map(|i| items[i]),
            next: items.get(index + 1).copied(),
        }
    }

    /// Whether `item` is the active sidebar entry for a request path.
    ///
    /// The bare docs root counts as the default document.
    #[must_use]
    pub fn is_active(item: &NavItem, request_path: &str) -> bool {
        item.path == Self::resolve_active_path(request_path)
    }

    /// Request path normalized to the route path of the page it shows.
    #[must_use]
    pub fn resolve_active_path(request_path: &str) -> String {
        match DocRoute::from_request_path(request_path) {
            Some(route) => route.current_path(),
            None => request_path.to_owned(),
        }
    }

    /// Check the tree against the content store.
    ///
    /// Reports duplicate and malformed paths, items whose source is missing,
    /// and documents under `docs/` that no item links to.
    #[must_use]
    pub fn validate(&self, storage: &dyn Storage) -> Vec<NavIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut listed_files = HashSet::new();

        for item in self.items() {
            if !seen.insert(item.path.as_str()) {
                issues.push(NavIssue::DuplicatePath {
                    path: item.path.clone(),
                });
                continue;
            }

            let Some(route) = DocRoute::from_request_path(&item.path) else {
                issues.push(NavIssue::InvalidPath {
                    path: item.path.clone(),
                });
                continue;
            };
            if route.is_default() && item.path != format!("{DOCS_PREFIX}/{DEFAULT_DOC}") {
                issues.push(NavIssue::InvalidPath {
                    path: item.path.clone(),
                });
                continue;
            }

            let file = route.file_path();
            if !storage.exists(&file) {
                issues.push(NavIssue::MissingDocument {
                    path: item.path.clone(),
                    file: file.display().to_string(),
                });
            }
            listed_files.insert(file);
        }

        match storage.scan(std::path::Path::new("docs")) {
            Ok(documents) => {
                for document in documents {
                    if !listed_files.contains(&document.path) {
                        issues.push(NavIssue::Unlisted {
                            file: document.path.display().to_string(),
                        });
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to scan docs directory"),
        }

        issues
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::builtin()
    }
}
