//! Syntax highlighting for fenced code blocks.
//!
//! Code is tokenized with syntect's bundled grammars and emitted as
//! class-annotated spans (`hl-` prefixed). Colors come from a stylesheet
//! generated once per theme with [`theme_css`].

use std::sync::Arc;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::state::escape_html;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Highlighting error.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Theme name is not part of the bundled theme set.
    #[error("Unknown highlight theme: {0}")]
    UnknownTheme(String),
    /// Syntect failed while producing output.
    #[error("Highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

/// Code block processor that highlights known languages.
///
/// The grammar set is shared between copies made with [`fresh`](Self::fresh),
/// so one highlighter can be loaded at startup and handed to every render.
pub struct SyntaxHighlighter {
    syntaxes: Arc<SyntaxSet>,
    warnings: Vec<String>,
}

impl SyntaxHighlighter {
    /// Load the bundled grammars.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntaxes: Arc::new(SyntaxSet::load_defaults_newlines()),
            warnings: Vec::new(),
        }
    }

    /// A copy sharing the grammars with no collected warnings.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self {
            syntaxes: Arc::clone(&self.syntaxes),
            warnings: Vec::new(),
        }
    }

    /// Highlight `code` as `language`.
    ///
    /// Returns `Ok(None)` when no grammar matches the language token.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::Syntect`] if a line fails to parse.
    pub fn highlight(&self, language: &str, code: &str) -> Result<Option<String>, HighlightError> {
        let Some(syntax) = self.syntaxes.find_syntax_by_token(language) else {
            return Ok(None);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(Some(format!(
            r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
            escape_html(language),
            generator.finalize()
        )))
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBlockProcessor for SyntaxHighlighter {
    fn process(&mut self, language: &str, source: &str) -> ProcessResult {
        match self.highlight(language, source) {
            Ok(Some(html)) => ProcessResult::Inline(html),
            Ok(None) => {
                self.warnings
                    .push(format!("no syntax definition for language '{language}'"));
                ProcessResult::PassThrough
            }
            Err(e) => {
                self.warnings
                    .push(format!("failed to highlight '{language}' block: {e}"));
                ProcessResult::PassThrough
            }
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Stylesheet for highlighted code in the given bundled theme.
///
/// # Errors
///
/// Returns [`HighlightError::UnknownTheme`] if the theme is not bundled.
pub fn theme_css(theme_name: &str) -> Result<String, HighlightError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme_name)
        .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_owned()))?;
    Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
}
