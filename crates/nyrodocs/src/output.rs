//! Styled terminal output on stderr.

use std::fmt::Display;

use console::{Style, Term};

/// Width of the label column in [`Output::field`].
const LABEL_WIDTH: usize = 14;

pub(crate) struct Output {
    term: Term,
    heading: Style,
    label: Style,
    ok: Style,
    warn: Style,
    err: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            heading: Style::new().cyan().bold(),
            label: Style::new().dim(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            err: Style::new().red(),
        }
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.line(&self.heading.apply_to(msg).to_string());
    }

    /// Aligned `label  value` line.
    pub(crate) fn field(&self, label: &str, value: &dyn Display) {
        let label = format!("{label:<width$}", width = LABEL_WIDTH);
        self.line(&format!("  {} {value}", self.label.apply_to(label)));
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.ok.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.err.apply_to(msg).to_string());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
