//! Site header.

use std::fmt::Write;

use nyro_renderer::escape_html;

use super::icons::Glyph;
use crate::SiteInfo;

const LINKS: [(&str, &str); 3] = [
    ("Home", "/"),
    ("Documentation", "/docs"),
    ("Changelog", "/changelog"),
];

/// Whether a header link is active for the page at `page_path`.
///
/// Home only matches itself; other links also match their sub-pages.
fn is_active(link_path: &str, page_path: &str) -> bool {
    if link_path == "/" {
        return page_path == "/";
    }
    page_path == link_path
        || page_path
            .strip_prefix(link_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub(crate) fn header(info: &SiteInfo, page_path: &str) -> String {
    let mut out = String::new();
    let name = escape_html(&info.name);

    let _ = write!(
        out,
        r#"<header class="site-header"><div class="container"><a class="brand" href="/">{name}</a>"#
    );
    let _ = write!(
        out,
        r#"<button class="menu-toggle" type="button" data-toggle="site-nav" aria-expanded="false" aria-label="Toggle menu">{}</button>"#,
        Glyph::Menu.svg("")
    );
    out.push_str(r#"<nav class="site-nav" id="site-nav">"#);

    for (title, path) in LINKS {
        let class = if is_active(path, page_path) {
            r#" class="active""#
        } else {
            ""
        };
        let _ = write!(out, r#"<a href="{path}"{class}>{title}</a>"#);
    }

    let _ = write!(
        out,
        r#"<div class="meta"><span class="version">{}</span>"#,
        escape_html(&info.version)
    );
    if !info.repository_url.is_empty() {
        let _ = write!(
            out,
            r#"<a href="{}" target="_blank" rel="noreferrer" title="View on GitHub">{}</a>"#,
            escape_html(&info.repository_url),
            Glyph::Github.svg("")
        );
    }
    out.push_str("</div></nav></div></header>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/docs/overview"));
        assert!(is_active("/docs", "/docs/overview"));
        assert!(is_active("/docs", "/docs"));
        assert!(!is_active("/docs", "/docsearch"));
        assert!(is_active("/changelog", "/changelog"));
    }

    #[test]
    fn test_header_marks_active_link() {
        let html = header(&SiteInfo::default(), "/docs/api/rest");

        assert!(html.contains(r#"<a href="/docs" class="active">Documentation</a>"#));
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains(r#"<span class="version">v1.0.0</span>"#));
        assert!(html.contains("https://github.com/TheRemyyy/nyro-db"));
    }

    #[test]
    fn test_header_without_repository() {
        let info = SiteInfo {
            repository_url: String::new(),
            ..SiteInfo::default()
        };
        assert!(!header(&info, "/").contains("View on GitHub"));
    }
}
