//! Code block processor trait.
//!
//! Processors are registered with the renderer and checked in order when a
//! fenced code block with a language is encountered. The first processor
//! returning [`ProcessResult::Inline`] wins; otherwise the renderer writes a
//! plain escaped block.

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with this HTML.
    Inline(String),

    /// Not handled; try the next processor or render as plain code.
    PassThrough,
}

/// Trait for processing fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `source` - Raw content of the code block
    fn process(&mut self, language: &str, source: &str) -> ProcessResult;

    /// Warnings collected while processing (e.g., unknown languages).
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Language from a fence info string: `rust title=main.rs` -> `rust`.
pub(crate) fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace()
        .next()
        .map(|lang| lang.trim_start_matches('{').trim_end_matches('}'))
        .filter(|lang| !lang.is_empty())
}
