//! Page shell shared by every HTML view.

use std::fmt::Write;

use chrono::Datelike;
use nyro_renderer::escape_html;

use super::footer::footer;
use super::header::header;
use crate::SiteInfo;

/// Content of one page.
pub(crate) struct Shell<'a> {
    /// Page title, shown before the site name.
    pub(crate) title: Option<&'a str>,
    /// Resolved route of the page; drives the active header link and live reload.
    pub(crate) page_path: &'a str,
    /// Inner HTML placed between header and footer.
    pub(crate) body: String,
}

/// Wrap a page body in the document shell.
pub(crate) fn render(info: &SiteInfo, live_reload: bool, shell: &Shell<'_>) -> String {
    let name = escape_html(&info.name);
    let title = match shell.title {
        Some(title) if !title.is_empty() => format!("{} | {name}", escape_html(title)),
        _ => name,
    };
    let page_path = escape_html(shell.page_path);

    let mut out = String::with_capacity(shell.body.len() + 4096);
    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title}</title><link rel="stylesheet" href="/assets/site.css"><link rel="stylesheet" href="/assets/highlight.css"><script src="/assets/site.js" defer></script>"#
    );
    if live_reload {
        out.push_str(r#"<script src="/assets/live-reload.js" defer></script>"#);
    }
    let _ = write!(out, r#"</head><body data-page-path="{page_path}">"#);

    out.push_str(&header(info, shell.page_path));
    out.push_str("<main>");
    out.push_str(&shell.body);
    out.push_str("</main>");
    out.push_str(&footer(info, chrono::Utc::now().year()));
    out.push_str("</body></html>");
    out
}

/// Page for routes that do not exist.
pub(crate) fn not_found_page(info: &SiteInfo, live_reload: bool, path: &str) -> String {
    render(
        info,
        live_reload,
        &Shell {
            title: Some("Not Found"),
            page_path: path,
            body: format!(
                r#"<div class="changelog"><div class="changelog-header"><h1>404</h1><p>No page at <code>{}</code>.</p><p><a class="button secondary" href="/">Back home</a></p></div></div>"#,
                escape_html(path)
            ),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(body: &str) -> Shell<'_> {
        Shell {
            title: Some("REST API"),
            page_path: "/docs/api/rest",
            body: body.to_owned(),
        }
    }

    #[test]
    fn test_render_shell() {
        let html = render(&SiteInfo::default(), false, &shell("<p>body</p>"));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>REST API | NyroDB</title>"));
        assert!(html.contains(r#"<body data-page-path="/docs/api/rest">"#));
        assert!(html.contains("<main><p>body</p></main>"));
        assert!(html.contains(r#"href="/assets/highlight.css""#));
        assert!(!html.contains("live-reload.js"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn test_render_with_live_reload() {
        let html = render(&SiteInfo::default(), true, &shell(""));
        assert!(html.contains(r#"<script src="/assets/live-reload.js" defer></script>"#));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render(
            &SiteInfo::default(),
            false,
            &Shell {
                title: Some("<b>x</b>"),
                page_path: "/",
                body: String::new(),
            },
        );
        assert!(html.contains("<title>&lt;b&gt;x&lt;/b&gt; | NyroDB</title>"));
    }

    #[test]
    fn test_not_found_page_escapes_path() {
        let html = not_found_page(&SiteInfo::default(), false, "/<script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<code><script>"));
    }
}
