//! Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::code_block::{CodeBlockProcessor, ProcessResult, fence_language};
use crate::links::resolve_link;
use crate::state::{Capture, Outline, Table, TocEntry, escape_html};

/// Parser with the GitHub-flavored extensions the site's content uses.
#[must_use]
pub fn gfm_parser(markdown: &str) -> Parser<'_> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    Parser::new_ext(markdown, options)
}

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub html: String,
    /// First H1 heading, when title extraction is on.
    pub title: Option<String>,
    pub toc: Vec<TocEntry>,
    /// Warnings reported by code block processors.
    pub warnings: Vec<String>,
}

/// Renders pulldown-cmark events to HTML5.
///
/// Headings get slug ids and feed the table of contents. Images are lazy
/// loaded. Relative `.md` links are rewritten to site routes when a base
/// path is set.
///
/// Fenced code blocks go through the [`CodeBlockProcessor`]s added with
/// [`with_processor`](Self::with_processor), in order; the first one that
/// returns [`ProcessResult::Inline`] wins. Unclaimed blocks render as
/// `<pre><code class="language-*">`.
pub struct MarkdownRenderer {
    output: String,
    capture: Option<Capture>,
    table: Option<Table>,
    outline: Outline,
    base_path: Option<String>,
    soft_breaks_as_br: bool,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            capture: None,
            table: None,
            outline: Outline::new(false),
            base_path: None,
            soft_breaks_as_br: false,
            processors: Vec::new(),
        }
    }

    /// Take the first H1 as the document title.
    ///
    /// The heading is still rendered but is left out of the table of contents.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.outline = Outline::new(true);
        self
    }

    /// Directory (e.g. `docs/api`) that relative `.md` links resolve against.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Render every newline inside a paragraph as a line break.
    #[must_use]
    pub fn with_soft_breaks_as_br(mut self) -> Self {
        self.soft_breaks_as_br = true;
        self
    }

    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => self.inline_code(&code),
                Event::Html(html) => self.output.push_str(&html),
                Event::InlineHtml(html) => self.inline(&html),
                Event::SoftBreak => self.soft_break(),
                Event::HardBreak => self.output.push_str("<br>"),
                Event::Rule => self.output.push_str("<hr>"),
                Event::TaskListMarker(checked) => {
                    let checked = if checked { " checked" } else { "" };
                    let _ = write!(
                        self.output,
                        r#"<input type="checkbox"{checked} disabled> "#
                    );
                }
                Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
            }
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.outline.take_title(),
            toc: self.outline.take_toc(),
            warnings: self
                .processors
                .iter()
                .flat_map(|p| p.warnings())
                .cloned()
                .collect(),
        }
    }

    /// Write inline markup into the open heading, or the output otherwise.
    ///
    /// Dropped while a capture is active: image alt text is plain text.
    fn inline(&mut self, html: &str) {
        if self.capture.is_some() {
            return;
        }
        match self.outline.current() {
            Some(heading) => heading.html.push_str(html),
            None => self.output.push_str(html),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            // Written on close, once the id is known
            Tag::Heading { level, .. } => self.outline.open(heading_level(level)),
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let language = match &kind {
                    CodeBlockKind::Fenced(info) => fence_language(info).map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.capture = Some(Capture::code(language));
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => {
                let _ = write!(self.output, r#"<ol start="{start}">"#);
            }
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table = Some(Table::new(alignments));
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                if let Some(table) = &mut self.table {
                    table.enter_head();
                }
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table.start_row();
                }
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                if let Some(table) = &self.table {
                    self.output.push_str(&table.open_cell());
                }
            }
            Tag::Emphasis => self.inline("<em>"),
            Tag::Strong => self.inline("<strong>"),
            Tag::Strikethrough => self.inline("<del>"),
            Tag::Superscript => self.inline("<sup>"),
            Tag::Subscript => self.inline("<sub>"),
            Tag::Link { dest_url, .. } => {
                let href = match &self.base_path {
                    Some(base) => resolve_link(&dest_url, base),
                    None => dest_url.into_string(),
                };
                self.inline(&format!(r#"<a href="{}">"#, escape_html(&href)));
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.capture = Some(Capture::image(
                    dest_url.into_string(),
                    title.into_string(),
                ));
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.outline.close() {
                    let _ = write!(
                        self.output,
                        r#"<h{level} id="{id}">{html}</h{level}>"#,
                        level = heading.level,
                        id = heading.id,
                        html = heading.html
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Some(Capture::Code { language, source }) = self.capture.take() {
                    self.code_block(language.as_deref(), &source);
                }
            }
            TagEnd::List(true) => self.output.push_str("</ol>"),
            TagEnd::List(false) => self.output.push_str("</ul>"),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => {
                self.table = None;
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                if let Some(table) = &mut self.table {
                    table.leave_head();
                }
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                if let Some(table) = &mut self.table {
                    self.output.push_str(table.close_cell());
                }
            }
            TagEnd::Emphasis => self.inline("</em>"),
            TagEnd::Strong => self.inline("</strong>"),
            TagEnd::Strikethrough => self.inline("</del>"),
            TagEnd::Superscript => self.inline("</sup>"),
            TagEnd::Subscript => self.inline("</sub>"),
            TagEnd::Link => self.inline("</a>"),
            TagEnd::Image => {
                if let Some(Capture::ImageAlt { src, title, alt }) = self.capture.take() {
                    self.inline(&image_html(&src, &alt, &title));
                }
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn code_block(&mut self, language: Option<&str>, source: &str) {
        let claimed = language.and_then(|language| {
            self.processors
                .iter_mut()
                .find_map(|processor| match processor.process(language, source) {
                    ProcessResult::Inline(html) => Some(html),
                    ProcessResult::PassThrough => None,
                })
        });
        if let Some(html) = claimed {
            self.output.push_str(&html);
            return;
        }

        let class = language
            .map(|language| format!(r#" class="language-{}""#, escape_html(language)))
            .unwrap_or_default();
        let _ = write!(
            self.output,
            "<pre><code{class}>{}</code></pre>",
            escape_html(source)
        );
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = &mut self.capture {
            capture.push_str(text);
        } else if let Some(heading) = self.outline.current() {
            heading.text.push_str(text);
            heading.html.push_str(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(capture) = &mut self.capture {
            capture.push_str(code);
            return;
        }
        if let Some(heading) = self.outline.current() {
            heading.text.push_str(code);
        }
        self.inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn soft_break(&mut self) {
        if let Some(capture) = &mut self.capture {
            capture.push_str(" ");
        } else if let Some(heading) = self.outline.current() {
            heading.text.push(' ');
            heading.html.push(' ');
        } else if self.soft_breaks_as_br {
            self.output.push_str("<br>\n");
        } else {
            self.output.push('\n');
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn image_html(src: &str, alt: &str, title: &str) -> String {
    let mut html = format!(r#"<img src="{}""#, escape_html(src));
    if !title.is_empty() {
        let _ = write!(html, r#" title="{}""#, escape_html(title));
    }
    let _ = write!(html, r#" alt="{}" loading="lazy">"#, escape_html(alt));
    html
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new().render(gfm_parser(markdown))
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render("Hello, world!").html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_soft_break_kept_as_newline_by_default() {
        assert_eq!(
            render("line one\nline two").html,
            "<p>line one\nline two</p>"
        );
    }

    #[test]
    fn test_soft_break_as_br() {
        let result = MarkdownRenderer::new()
            .with_soft_breaks_as_br()
            .render(gfm_parser("line one\nline two"));
        assert_eq!(result.html, "<p>line one<br>\nline two</p>");
    }

    #[test]
    fn test_heading_with_id() {
        let result = render("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].id, "section-title");
    }

    #[test]
    fn test_title_extraction() {
        let result = MarkdownRenderer::new()
            .with_title_extraction()
            .render(gfm_parser("# Overview\n\nIntro\n\n## Features"));

        assert_eq!(result.title, Some("Overview".to_owned()));
        assert!(result.html.contains(r#"<h1 id="overview">Overview</h1>"#));
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 2);
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let result = render("## Run `nyrodb` **now**");
        assert_eq!(
            result.html,
            r#"<h2 id="run-nyrodb-now">Run <code>nyrodb</code> <strong>now</strong></h2>"#
        );
        assert_eq!(result.toc[0].title, "Run nyrodb now");
    }

    #[test]
    fn test_inline_html_stays_in_heading() {
        let result = render("## Insert <span>beta</span>");
        assert_eq!(
            result.html,
            r#"<h2 id="insert-beta">Insert <span>beta</span></h2>"#
        );
        assert_eq!(result.toc[0].title, "Insert beta");
    }

    #[test]
    fn test_table_with_alignment() {
        let result = render("| Op | Latency |\n|:---|---:|\n| insert | <1μs |");
        assert_eq!(
            result.html,
            concat!(
                r#"<table><thead><tr><th style="text-align:left">Op</th>"#,
                r#"<th style="text-align:right">Latency</th></tr></thead>"#,
                r#"<tbody><tr><td style="text-align:left">insert</td>"#,
                r#"<td style="text-align:right">&lt;1μs</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_strikethrough_and_tasklist() {
        let html = render("- [x] ~~old~~\n- [ ] new").html;
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains(r#"<input type="checkbox" checked disabled> "#));
        assert!(html.contains(r#"<input type="checkbox" disabled> "#));
    }

    #[test]
    fn test_ordered_list_start() {
        let html = render("3. three\n4. four").html;
        assert!(html.starts_with(r#"<ol start="3"><li>three</li>"#));
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn test_code_block_without_processor() {
        assert_eq!(
            render("```json\n{\"id\": 1}\n```").html,
            "<pre><code class=\"language-json\">{&quot;id&quot;: 1}\n</code></pre>"
        );
    }

    #[test]
    fn test_indented_code_block_has_no_language() {
        let html = render("    plain\n").html;
        assert!(html.starts_with("<pre><code>plain"));
        assert!(!html.contains("class="));
    }

    #[test]
    fn test_image_inside_paragraph() {
        assert_eq!(
            render("![Diagram](arch.png)").html,
            r#"<p><img src="arch.png" alt="Diagram" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_image_with_title_and_code_alt() {
        assert_eq!(
            render(r#"![The `wal` layer](arch.png "Layers")"#).html,
            r#"<p><img src="arch.png" title="Layers" alt="The wal layer" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_image_alt_drops_inline_markup() {
        assert_eq!(
            render("![the *wal* layer](a.png)").html,
            r#"<p><img src="a.png" alt="the wal layer" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            render("> note\n\n---").html,
            "<blockquote><p>note</p></blockquote><hr>"
        );
    }

    #[test]
    fn test_link_without_base_path_unchanged() {
        assert_eq!(
            render("[config](./configuration.md)").html,
            r#"<p><a href="./configuration.md">config</a></p>"#
        );
    }

    #[test]
    fn test_link_with_base_path() {
        let result = MarkdownRenderer::new()
            .with_base_path("docs/getting_started")
            .render(gfm_parser("[config](./configuration.md)"));
        assert_eq!(
            result.html,
            r#"<p><a href="/docs/getting_started/configuration">config</a></p>"#
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert!(
            render("<div class=\"note\">hi</div>\n")
                .html
                .starts_with("<div class=\"note\">hi</div>")
        );
    }

    struct Shout;

    impl CodeBlockProcessor for Shout {
        fn process(&mut self, language: &str, source: &str) -> ProcessResult {
            if language == "shout" {
                ProcessResult::Inline(format!("<p>{}</p>", source.trim().to_uppercase()))
            } else {
                ProcessResult::PassThrough
            }
        }
    }

    #[test]
    fn test_processor_inline_and_pass_through() {
        let result = MarkdownRenderer::new()
            .with_processor(Shout)
            .render(gfm_parser("```shout\nhello\n```\n\n```text\nquiet\n```"));
        assert_eq!(
            result.html,
            "<p>HELLO</p><pre><code class=\"language-text\">quiet\n</code></pre>"
        );
    }
}
