//! Site structure and page rendering for the NyroDB documentation site.
//!
//! - [`Navigation`]: the fixed sidebar tree with previous/next and active-item lookups
//! - [`DocRoute`]: maps `/docs/<sub>` requests to `docs/<sub>.md` sources
//! - [`Site`]: renders documents and the changelog with fallbacks and caching
//! - [`RenderCache`]: generation-guarded memoization of rendered pages
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nyro_site::{DocRoute, Site, SiteOptions};
//! use nyro_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new("public".into()));
//! let site = Site::new(storage, SiteOptions::default());
//!
//! let page = site.render_doc(&DocRoute::from_sub_path("api/rest"));
//! assert_eq!(page.current_path, "/docs/api/rest");
//! ```

mod cache;
mod error;
mod navigation;
mod route;
mod site;

pub use cache::{RenderCache, RenderTicket};
pub use error::RenderError;
pub use navigation::{Icon, NavIssue, NavItem, NavSection, Navigation, PrevNext};
pub use route::{DEFAULT_DOC, DOCS_PREFIX, DocRoute};
pub use site::{
    CHANGELOG_NOT_FOUND_HTML, ChangelogPage, DOC_NOT_FOUND_HTML, DocPage, Site, SiteOptions,
};
