//! Markdown to HTML renderer for the NyroDB documentation site.
//!
//! This crate provides [`MarkdownRenderer`], which turns markdown into HTML
//! with heading anchors and a table of contents, plus a [`SyntaxHighlighter`]
//! that plugs into the renderer as a [`CodeBlockProcessor`].
//!
//! Documents are parsed with GitHub-flavored extensions (tables,
//! strikethrough, task lists). With [`MarkdownRenderer::with_soft_breaks_as_br`]
//! a single newline inside a paragraph renders as `<br>`, matching how the
//! site's authors write prose.
//!
//! # Example
//!
//! ```
//! use nyro_renderer::{MarkdownRenderer, SyntaxHighlighter, gfm_parser};
//!
//! let markdown = "# Hello\n\n```rust\nfn main() {}\n```";
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .with_processor(SyntaxHighlighter::new())
//!     .render(gfm_parser(markdown));
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```

mod code_block;
mod highlight;
mod links;
mod renderer;
mod state;

pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use highlight::{DEFAULT_THEME, HighlightError, SyntaxHighlighter, theme_css};
pub use renderer::{MarkdownRenderer, RenderResult, gfm_parser};
pub use state::{TocEntry, escape_html, slugify};
