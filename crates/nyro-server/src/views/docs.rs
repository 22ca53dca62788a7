//! Documentation browser: sidebar, content and previous/next links.

use std::fmt::Write;

use nyro_renderer::escape_html;
use nyro_site::{DocPage, NavItem, Navigation};

use super::icons::Glyph;

pub(crate) fn docs_page(navigation: &Navigation, page: &DocPage) -> String {
    let mut out = String::with_capacity(page.html.len() + 4096);

    let _ = write!(
        out,
        r#"<div class="docs-layout"><div class="docs-mobile-bar"><span>Documentation</span><button class="menu-toggle" type="button" data-toggle="docs-sidebar" aria-expanded="false" aria-label="Toggle navigation">{}</button></div>"#,
        Glyph::Menu.svg("")
    );

    sidebar(&mut out, navigation, &page.current_path);

    out.push_str(r#"<div class="docs-main"><article class="prose">"#);
    out.push_str(&page.html);
    out.push_str("</article>");
    pager(&mut out, page.prev.as_ref(), page.next.as_ref());
    out.push_str("</div></div>");
    out
}

fn sidebar(out: &mut String, navigation: &Navigation, current_path: &str) {
    out.push_str(r#"<aside class="sidebar" id="docs-sidebar"><nav>"#);
    for section in navigation.sections() {
        let _ = write!(out, "<h3>{}</h3><ul>", escape_html(&section.title));
        for item in &section.items {
            let active = Navigation::is_active(item, current_path);
            let _ = write!(
                out,
                r#"<li><a href="{}"{}>{}{}"#,
                escape_html(&item.path),
                if active { r#" class="active""# } else { "" },
                Glyph::from(item.icon).svg(""),
                escape_html(&item.title)
            );
            if active {
                out.push_str(&Glyph::ChevronRight.svg("chevron"));
            }
            out.push_str("</a></li>");
        }
        out.push_str("</ul>");
    }
    out.push_str("</nav></aside>");
}

fn pager(out: &mut String, prev: Option<&NavItem>, next: Option<&NavItem>) {
    out.push_str(r#"<nav class="pager">"#);
    match prev {
        Some(item) => {
            let _ = write!(
                out,
                r#"<a class="prev" href="{}">{}<div><div class="direction">Previous</div><div class="title">{}</div></div></a>"#,
                escape_html(&item.path),
                Glyph::ChevronLeft.svg(""),
                escape_html(&item.title)
            );
        }
        None => out.push_str("<span></span>"),
    }
    if let Some(item) = next {
        let _ = write!(
            out,
            r#"<a class="next" href="{}">{}<div><div class="direction">Next</div><div class="title">{}</div></div></a>"#,
            escape_html(&item.path),
            Glyph::ChevronRight.svg(""),
            escape_html(&item.title)
        );
    }
    out.push_str("</nav>");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use nyro_site::Icon;

    use super::*;

    fn page(current_path: &str, prev: Option<NavItem>, next: Option<NavItem>) -> DocPage {
        DocPage {
            current_path: current_path.to_owned(),
            source_file: PathBuf::from("docs/x.md"),
            html: "<h1>Title</h1>".to_owned(),
            title: Some("Title".to_owned()),
            toc: Vec::new(),
            found: true,
            last_modified: None,
            prev,
            next,
        }
    }

    #[test]
    fn test_single_active_sidebar_item() {
        let html = docs_page(
            &Navigation::builtin(),
            &page("/docs/api/realtime", None, None),
        );

        assert_eq!(html.matches(r#"class="active""#).count(), 1);
        assert!(html.contains(r#"<a href="/docs/api/realtime" class="active">"#));
        assert!(html.contains("<h3>API Reference</h3>"));
        assert!(html.contains(r#"<article class="prose"><h1>Title</h1></article>"#));
    }

    #[test]
    fn test_pager_links() {
        let html = docs_page(
            &Navigation::builtin(),
            &page(
                "/docs/getting_started/installation",
                Some(NavItem::new("Overview", "/docs/overview", Icon::BookOpen)),
                Some(NavItem::new(
                    "Configuration",
                    "/docs/getting_started/configuration",
                    Icon::Settings,
                )),
            ),
        );

        assert!(html.contains(r#"<a class="prev" href="/docs/overview">"#));
        assert!(html.contains(r#"<a class="next" href="/docs/getting_started/configuration">"#));
    }

    #[test]
    fn test_pager_first_page_has_no_prev() {
        let html = docs_page(
            &Navigation::builtin(),
            &page(
                "/docs/overview",
                None,
                Some(NavItem::new(
                    "Installation",
                    "/docs/getting_started/installation",
                    Icon::Server,
                )),
            ),
        );

        assert!(!html.contains(r#"class="prev""#));
        assert!(html.contains(r#"<nav class="pager"><span></span><a class="next""#));
    }
}
