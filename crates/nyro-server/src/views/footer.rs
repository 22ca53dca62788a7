//! Site footer.

use std::fmt::Write;

use nyro_renderer::escape_html;
use nyro_site::Icon;

use super::icons::Glyph;
use crate::SiteInfo;

pub(crate) fn footer(info: &SiteInfo, year: i32) -> String {
    let name = escape_html(&info.name);
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<footer class="site-footer"><div class="container"><div class="footer-grid"><div><div class="brand">{name}</div><p>The next-generation database engine engineered for extreme performance and zero-copy architecture.</p></div>"#
    );

    let _ = write!(
        out,
        r#"<div><h3>Resources</h3><div class="footer-links"><a href="/docs">{}Documentation</a><a href="/docs/getting_started/installation">{}Installation</a></div></div>"#,
        Glyph::Nav(Icon::BookOpen).svg(""),
        Glyph::Nav(Icon::Server).svg("")
    );

    out.push_str(r#"<div><h3>Community</h3><div class="footer-links">"#);
    if !info.repository_url.is_empty() {
        let _ = write!(
            out,
            r#"<a href="{}" target="_blank" rel="noreferrer">{}GitHub</a>"#,
            escape_html(&info.repository_url),
            Glyph::Github.svg("")
        );
    }
    let _ = write!(
        out,
        r#"<span class="disabled">{}Twitter <span class="badge">Soon</span></span><span class="disabled">{}Discord <span class="badge">Soon</span></span></div></div></div>"#,
        Glyph::Twitter.svg(""),
        Glyph::MessageCircle.svg("")
    );

    let _ = write!(
        out,
        r#"<div class="footer-bottom"><div>&copy; {year} {name} Contributors. MIT License.</div><div>Built with {} in Rust</div></div></div></footer>"#,
        Glyph::Heart.svg("heart")
    );
    out
}
