//! Documentation and changelog rendering.
//!
//! [`Site`] ties the content store, the navigation tree and the markdown
//! renderer together. Every lookup succeeds: sources that cannot be loaded
//! are logged and replaced by fixed fallback content, and the returned page
//! records whether its source was found.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nyro_renderer::{MarkdownRenderer, RenderResult, SyntaxHighlighter, TocEntry, gfm_parser};
use nyro_storage::Storage;

use crate::cache::RenderCache;
use crate::error::RenderError;
use crate::navigation::{NavItem, Navigation};
use crate::route::DocRoute;

/// Content shown for a documentation page whose source cannot be loaded.
///
/// This is the rendered form of the markdown fallback
/// `# 404 Not Found` followed by `Request document could not be loaded.`,
/// without the heading anchor.
pub const DOC_NOT_FOUND_HTML: &str =
    "<h1>404 Not Found</h1><p>Request document could not be loaded.</p>";

/// Content shown when the changelog cannot be loaded.
pub const CHANGELOG_NOT_FOUND_HTML: &str = "<h1>Changelog not found</h1>";

const CHANGELOG_KEY: &str = "/changelog";

/// Options for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// Changelog path relative to the content root.
    pub changelog_path: PathBuf,
    /// Highlight fenced code blocks.
    pub highlight: bool,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            changelog_path: PathBuf::from("CHANGELOG.md"),
            highlight: true,
        }
    }
}

/// A rendered documentation page.
#[derive(Clone, Debug)]
pub struct DocPage {
    /// Route path, e.g. `/docs/overview`.
    pub current_path: String,
    /// Source file relative to the content root.
    pub source_file: PathBuf,
    pub html: String,
    /// First H1 heading.
    pub title: Option<String>,
    pub toc: Vec<TocEntry>,
    /// Whether the source was loaded. `false` means `html` is fallback content.
    pub found: bool,
    /// Source modification time (seconds since Unix epoch).
    pub last_modified: Option<f64>,
    pub prev: Option<NavItem>,
    pub next: Option<NavItem>,
}

/// The rendered changelog.
#[derive(Clone, Debug)]
pub struct ChangelogPage {
    pub html: String,
    pub title: Option<String>,
    pub found: bool,
    pub last_modified: Option<f64>,
}

struct Rendered {
    result: RenderResult,
    mtime: Option<f64>,
}

/// Renders site pages from a content store.
///
/// Successful renders are cached per route and revalidated against the
/// source mtime, so edits are picked up with or without a file watcher.
/// Failed loads are never cached.
pub struct Site {
    storage: Arc<dyn Storage>,
    navigation: Navigation,
    highlighter: Option<SyntaxHighlighter>,
    changelog_path: PathBuf,
    docs: RenderCache<Arc<DocPage>>,
    changelog: RenderCache<Arc<ChangelogPage>>,
}

impl Site {
    /// Create a site with the built-in navigation.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, options: SiteOptions) -> Self {
        Self {
            storage,
            navigation: Navigation::builtin(),
            highlighter: options.highlight.then(SyntaxHighlighter::new),
            changelog_path: options.changelog_path,
            docs: RenderCache::new(),
            changelog: RenderCache::new(),
        }
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn changelog_path(&self) -> &Path {
        &self.changelog_path
    }

    /// Render the documentation page for `route`.
    ///
    /// A source that cannot be loaded yields [`DOC_NOT_FOUND_HTML`], or empty
    /// content for the default page.
    pub fn render_doc(&self, route: &DocRoute) -> Arc<DocPage> {
        let key = route.current_path();
        let source = route.file_path();

        if let Some(cached) = self.docs.get(&key) {
            if self.is_fresh(&source, cached.last_modified) {
                tracing::debug!(path = %key, "Serving cached document");
                return cached;
            }
        }

        let ticket = self.docs.ticket();
        let links = self.navigation.prev_next(&key);
        let (prev, next) = (links.prev.cloned(), links.next.cloned());

        match self.render_source(&source, &route.base_dir()) {
            Ok(Rendered { result, mtime }) => {
                let page = Arc::new(DocPage {
                    current_path: key.clone(),
                    source_file: source,
                    html: result.html,
                    title: result.title,
                    toc: result.toc,
                    found: true,
                    last_modified: mtime,
                    prev,
                    next,
                });
                self.docs.insert(key, Arc::clone(&page), ticket);
                page
            }
            Err(e) => {
                tracing::warn!(path = %key, error = %e, "Failed to load document");
                let html = if route.is_default() {
                    String::new()
                } else {
                    DOC_NOT_FOUND_HTML.to_owned()
                };
                Arc::new(DocPage {
                    current_path: key,
                    source_file: source,
                    html,
                    title: None,
                    toc: Vec::new(),
                    found: false,
                    last_modified: None,
                    prev,
                    next,
                })
            }
        }
    }

    /// Render the changelog, or [`CHANGELOG_NOT_FOUND_HTML`] if it cannot be loaded.
    pub fn render_changelog(&self) -> Arc<ChangelogPage> {
        if let Some(cached) = self.changelog.get(CHANGELOG_KEY) {
            if self.is_fresh(&self.changelog_path, cached.last_modified) {
                return cached;
            }
        }

        let ticket = self.changelog.ticket();
        match self.render_source(&self.changelog_path, "") {
            Ok(Rendered { result, mtime }) => {
                let page = Arc::new(ChangelogPage {
                    html: result.html,
                    title: result.title,
                    found: true,
                    last_modified: mtime,
                });
                self.changelog
                    .insert(CHANGELOG_KEY, Arc::clone(&page), ticket);
                page
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load changelog");
                Arc::new(ChangelogPage {
                    html: CHANGELOG_NOT_FOUND_HTML.to_owned(),
                    title: None,
                    found: false,
                    last_modified: None,
                })
            }
        }
    }

    /// Drop cached output for a changed source file.
    ///
    /// Returns the route path showing that file, if any.
    pub fn invalidate_source(&self, file: &Path) -> Option<String> {
        if file == self.changelog_path {
            self.changelog.invalidate(CHANGELOG_KEY);
            return Some(CHANGELOG_KEY.to_owned());
        }

        let route = DocRoute::from_source_file(file)?;
        let path = route.current_path();
        self.docs.invalidate(&path);
        Some(path)
    }

    /// Drop all cached output.
    pub fn invalidate_all(&self) {
        self.docs.invalidate_all();
        self.changelog.invalidate_all();
    }

    #[allow(clippy::float_cmp)]
    fn is_fresh(&self, source: &Path, cached_mtime: Option<f64>) -> bool {
        self.storage.mtime(source).ok() == cached_mtime
    }

    fn render_source(&self, source: &Path, base_dir: &str) -> Result<Rendered, RenderError> {
        // Taken before the read so a concurrent edit leaves the entry stale, not wrong.
        let mtime = self.storage.mtime(source).ok();
        let markdown = self
            .storage
            .read(source)
            .map_err(|e| RenderError::from_storage(source.to_path_buf(), e))?;

        let mut renderer = MarkdownRenderer::new()
            .with_title_extraction()
            .with_soft_breaks_as_br()
            .with_base_path(base_dir);
        if let Some(highlighter) = &self.highlighter {
            renderer = renderer.with_processor(highlighter.fresh());
        }

        let result = renderer.render(gfm_parser(&markdown));
        for warning in &result.warnings {
            tracing::debug!(source = %source.display(), %warning, "Render warning");
        }

        Ok(Rendered { result, mtime })
    }
}

#[cfg(test)]
mod tests {
    use nyro_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn site_with(storage: MockStorage) -> (Arc<MockStorage>, Site) {
        let storage = Arc::new(storage);
        let site = Site::new(
            Arc::clone(&storage) as Arc<dyn Storage>,
            SiteOptions {
                highlight: false,
                ..SiteOptions::default()
            },
        );
        (storage, site)
    }

    #[test]
    fn test_render_existing_doc() {
        let (_, site) = site_with(MockStorage::new().with_file(
            "docs/getting_started/installation.md",
            "# Installation\n\n## Build\n\nRun cargo.",
        ));

        let page = site.render_doc(&DocRoute::from_sub_path("getting_started/installation"));

        assert!(page.found);
        assert_eq!(page.title.as_deref(), Some("Installation"));
        assert!(page.html.contains("<p>Run cargo.</p>"));
        assert_eq!(page.toc.len(), 1);
        assert_eq!(page.prev.as_ref().unwrap().path, "/docs/overview");
        assert_eq!(
            page.next.as_ref().unwrap().path,
            "/docs/getting_started/configuration"
        );
    }

    #[test]
    fn test_soft_breaks_render_as_br() {
        let (_, site) = site_with(
            MockStorage::new().with_file("docs/overview.md", "line one\nline two"),
        );

        let page = site.render_doc(&DocRoute::from_sub_path(""));
        assert!(page.html.contains("line one<br>"));
    }

    #[test]
    fn test_missing_doc_renders_fallback() {
        let (_, site) = site_with(MockStorage::new());

        let page = site.render_doc(&DocRoute::from_sub_path("api/missing"));

        assert!(!page.found);
        assert_eq!(page.html, DOC_NOT_FOUND_HTML);
        assert!(page.prev.is_none());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_doc_fallback_matches_markdown_source() {
        let rendered = MarkdownRenderer::new()
            .render(gfm_parser(
                "# 404 Not Found\n\nRequest document could not be loaded.",
            ))
            .html;

        assert_eq!(
            rendered.replace(r#" id="404-not-found""#, ""),
            DOC_NOT_FOUND_HTML
        );
    }

    #[test]
    fn test_missing_default_doc_is_empty() {
        let (_, site) = site_with(MockStorage::new());

        let page = site.render_doc(&DocRoute::from_sub_path(""));

        assert!(!page.found);
        assert_eq!(page.html, "");
        assert_eq!(page.current_path, "/docs/overview");
    }

    #[test]
    fn test_read_error_renders_fallback() {
        let (_, site) = site_with(
            MockStorage::new()
                .with_file("docs/api/rest.md", "# REST API")
                .with_permission_denied("docs/api/rest.md"),
        );

        let page = site.render_doc(&DocRoute::from_sub_path("api/rest"));
        assert!(!page.found);
        assert_eq!(page.html, DOC_NOT_FOUND_HTML);
    }

    #[test]
    fn test_parent_dir_treated_as_missing() {
        let (_, site) = site_with(MockStorage::new().with_file("secret.md", "# Secret"));

        let page = site.render_doc(&DocRoute::from_sub_path("../secret"));
        assert!(!page.found);
        assert_eq!(page.html, DOC_NOT_FOUND_HTML);
    }

    #[test]
    fn test_relative_links_resolved_against_page() {
        let (_, site) = site_with(MockStorage::new().with_file(
            "docs/getting_started/installation.md",
            "See [configuration](./configuration.md).",
        ));

        let page = site.render_doc(&DocRoute::from_sub_path("getting_started/installation"));
        assert!(
            page.html
                .contains(r#"href="/docs/getting_started/configuration""#)
        );
    }

    #[test]
    fn test_cached_while_mtime_unchanged() {
        let (storage, site) = site_with(
            MockStorage::new()
                .with_file("docs/overview.md", "# First")
                .with_mtime("docs/overview.md", 1.0),
        );
        let route = DocRoute::from_sub_path("overview");

        let first = site.render_doc(&route);
        storage.set_content("docs/overview.md", "# Second");
        let cached = site.render_doc(&route);

        assert!(Arc::ptr_eq(&first, &cached));
        assert_eq!(cached.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_invalidate_source_rerenders() {
        let (storage, site) = site_with(MockStorage::new().with_file("docs/api/rest.md", "# v1"));
        let route = DocRoute::from_sub_path("api/rest");

        assert_eq!(site.render_doc(&route).title.as_deref(), Some("v1"));

        storage.set_content("docs/api/rest.md", "# v2");
        assert_eq!(
            site.invalidate_source(Path::new("docs/api/rest.md")),
            Some("/docs/api/rest".to_owned())
        );
        assert_eq!(site.render_doc(&route).title.as_deref(), Some("v2"));
    }

    #[test]
    fn test_failures_not_cached() {
        let (storage, site) = site_with(MockStorage::new());
        let route = DocRoute::from_sub_path("api/realtime");

        assert!(!site.render_doc(&route).found);

        storage.set_content("docs/api/realtime.md", "# Real-Time API");
        assert!(site.render_doc(&route).found);
    }

    #[test]
    fn test_render_changelog() {
        let (_, site) = site_with(
            MockStorage::new().with_file("CHANGELOG.md", "# Changelog\n\n## v1.0.0\n\n- Initial release"),
        );

        let page = site.render_changelog();
        assert!(page.found);
        assert_eq!(page.title.as_deref(), Some("Changelog"));
        assert!(page.html.contains("<li>Initial release</li>"));
    }

    #[test]
    fn test_missing_changelog() {
        let (_, site) = site_with(MockStorage::new());

        let page = site.render_changelog();
        assert!(!page.found);
        assert_eq!(page.html, CHANGELOG_NOT_FOUND_HTML);
    }

    #[test]
    fn test_invalidate_changelog() {
        let (storage, site) = site_with(MockStorage::new().with_file("CHANGELOG.md", "# Old"));
        assert_eq!(site.render_changelog().title.as_deref(), Some("Old"));

        storage.set_content("CHANGELOG.md", "# New");
        assert_eq!(
            site.invalidate_source(Path::new("CHANGELOG.md")),
            Some("/changelog".to_owned())
        );
        assert_eq!(site.render_changelog().title.as_deref(), Some("New"));
    }

    #[test]
    fn test_invalidate_unrelated_file() {
        let (_, site) = site_with(MockStorage::new());
        assert_eq!(site.invalidate_source(Path::new("docs/diagram.png")), None);
        assert_eq!(site.invalidate_source(Path::new("index.html")), None);
    }

    #[test]
    fn test_highlighting_enabled() {
        let storage = Arc::new(
            MockStorage::new().with_file("docs/overview.md", "```rust\nfn main() {}\n```\n"),
        );
        let site = Site::new(storage, SiteOptions::default());

        let page = site.render_doc(&DocRoute::from_sub_path("overview"));
        assert!(page.html.contains(r#"<pre class="highlight">"#));
    }
}
