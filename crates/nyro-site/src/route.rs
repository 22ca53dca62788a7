//! Documentation routes and their source files.

use std::path::{Path, PathBuf};

/// URL prefix of documentation pages.
pub const DOCS_PREFIX: &str = "/docs";

/// Sub-path shown for the bare docs root.
pub const DEFAULT_DOC: &str = "overview";

/// Directory of documentation sources under the content root.
const DOCS_DIR: &str = "docs";

/// A documentation page request.
///
/// Built from the part of the URL after `/docs/`. Leading and trailing
/// slashes are ignored and an empty sub-path means [`DEFAULT_DOC`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocRoute {
    sub_path: String,
}

impl DocRoute {
    #[must_use]
    pub fn from_sub_path(sub_path: &str) -> Self {
        let trimmed = sub_path.trim_matches('/');
        let sub_path = if trimmed.is_empty() {
            DEFAULT_DOC
        } else {
            trimmed
        };
        Self {
            sub_path: sub_path.to_owned(),
        }
    }

    /// Route for a full request path such as `/docs/api/rest`.
    ///
    /// Returns `None` for paths outside `/docs`.
    #[must_use]
    pub fn from_request_path(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(DOCS_PREFIX)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(Self::from_sub_path(rest))
    }

    /// Route whose source is `file`, e.g. `docs/api/rest.md`.
    ///
    /// Returns `None` for files outside `docs/` or without `.md` extension.
    #[must_use]
    pub fn from_source_file(file: &Path) -> Option<Self> {
        if file.extension().is_none_or(|ext| ext != "md") {
            return None;
        }
        let relative = file.strip_prefix(DOCS_DIR).ok()?.with_extension("");
        let sub_path: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        if sub_path.is_empty() {
            return None;
        }
        Some(Self::from_sub_path(&sub_path.join("/")))
    }

    #[must_use]
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// `/docs/<sub>`.
    #[must_use]
    pub fn current_path(&self) -> String {
        format!("{DOCS_PREFIX}/{}", self.sub_path)
    }

    /// Source file relative to the content root: `docs/<sub>.md`.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(format!("{DOCS_DIR}/{}.md", self.sub_path))
    }

    /// Directory used to resolve relative links in the page.
    #[must_use]
    pub fn base_dir(&self) -> String {
        match self.sub_path.rsplit_once('/') {
            Some((dir, _)) => format!("{DOCS_DIR}/{dir}"),
            None => DOCS_DIR.to_owned(),
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.sub_path == DEFAULT_DOC
    }
}
