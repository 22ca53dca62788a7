//! State tracked while walking markdown events.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;
use serde::Serialize;

/// Text diverted away from the output until its element closes.
pub(crate) enum Capture {
    /// Body of a code block; `language` comes from the fence info string.
    Code {
        language: Option<String>,
        source: String,
    },
    /// Alt text of an image, written as an attribute when the image ends.
    ImageAlt {
        src: String,
        title: String,
        alt: String,
    },
}

impl Capture {
    pub(crate) fn code(language: Option<String>) -> Self {
        Self::Code {
            language,
            source: String::new(),
        }
    }

    pub(crate) fn image(src: String, title: String) -> Self {
        Self::ImageAlt {
            src,
            title,
            alt: String::new(),
        }
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        match self {
            Self::Code { source, .. } => source.push_str(text),
            Self::ImageAlt { alt, .. } => alt.push_str(text),
        }
    }
}

/// Column alignments and cell cursor of the table being written.
pub(crate) struct Table {
    alignments: Vec<Alignment>,
    column: usize,
    in_head: bool,
}

impl Table {
    pub(crate) fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            column: 0,
            in_head: false,
        }
    }

    pub(crate) fn enter_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub(crate) fn leave_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.column = 0;
    }

    /// Opening tag for the cell at the cursor.
    pub(crate) fn open_cell(&self) -> String {
        let align = match self.alignments.get(self.column) {
            Some(Alignment::Left) => "left",
            Some(Alignment::Center) => "center",
            Some(Alignment::Right) => "right",
            Some(Alignment::None) | None => return format!("<{}>", self.cell_tag()),
        };
        format!(r#"<{} style="text-align:{align}">"#, self.cell_tag())
    }

    /// Closing tag for the cell at the cursor; advances to the next column.
    pub(crate) fn close_cell(&mut self) -> &'static str {
        self.column += 1;
        if self.in_head { "</th>" } else { "</td>" }
    }

    fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    pub title: String,
    /// Anchor id of the rendered heading.
    pub id: String,
}

/// Heading whose content is still being collected.
pub(crate) struct OpenHeading {
    level: u8,
    /// Plain text, for the slug and the ToC.
    pub(crate) text: String,
    /// Rendered inline content.
    pub(crate) html: String,
}

/// A heading ready to be written.
pub(crate) struct ClosedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) html: String,
}

/// Document outline: title, ToC and unique anchor ids.
pub(crate) struct Outline {
    extract_title: bool,
    title: Option<String>,
    toc: Vec<TocEntry>,
    open: Option<OpenHeading>,
    /// Next suffix to try for each slug.
    slugs: HashMap<String, usize>,
    /// Ids already handed out.
    ids: HashSet<String>,
}

impl Outline {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            title: None,
            toc: Vec::new(),
            open: None,
            slugs: HashMap::new(),
            ids: HashSet::new(),
        }
    }

    pub(crate) fn open(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    /// The heading being collected, if any.
    pub(crate) fn current(&mut self) -> Option<&mut OpenHeading> {
        self.open.as_mut()
    }

    /// Finish the open heading.
    ///
    /// With title extraction the first H1 becomes the title instead of a
    /// ToC entry. It is rendered either way.
    pub(crate) fn close(&mut self) -> Option<ClosedHeading> {
        let OpenHeading { level, text, html } = self.open.take()?;
        let id = self.unique_id(&text);
        let text = text.trim().to_owned();

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(text);
        } else {
            self.toc.push(TocEntry {
                level,
                title: text,
                id: id.clone(),
            });
        }

        Some(ClosedHeading {
            level,
            id,
            html: html.trim().to_owned(),
        })
    }

    /// Slug of `text`, suffixed `-1`, `-2`, ... until it is unused.
    ///
    /// Headings without any slug characters use `section`.
    fn unique_id(&mut self, text: &str) -> String {
        let mut slug = slugify(text);
        if slug.is_empty() {
            slug = "section".to_owned();
        }
        let next = self.slugs.entry(slug.clone()).or_insert(0);
        let mut id = if *next == 0 {
            slug.clone()
        } else {
            format!("{slug}-{next}")
        };
        while self.ids.contains(&id) {
            *next += 1;
            id = format!("{slug}-{next}");
        }
        *next += 1;
        self.ids.insert(id.clone());
        id
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// URL-safe anchor for a heading.
///
/// Words are split on whitespace, dashes and underscores, reduced to
/// lowercase ASCII alphanumerics and joined with single dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Escape text for HTML content and double- or single-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push_str(entity);
    }
    out
}
